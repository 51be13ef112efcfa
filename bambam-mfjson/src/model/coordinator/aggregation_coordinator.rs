use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use super::{AggregationStats, EmissionError, EntityHistory, EntityLane, FlushReport, IngestOutcome};
use crate::config::AggregatorConfig;
use crate::model::buffer::AppendOutcome;
use crate::model::encoding::TrajectoryEncoder;
use crate::model::interpolation::InterpolationTable;
use crate::model::report::RawPositionReport;
use crate::model::sample::{CanonicalSample, NormalizedReport, PropertyCatalog, SampleNormalizer};
use crate::model::segmentation::{ClosureReason, SegmentationDecision, SegmentationPolicy};
use crate::model::sink::TrajectorySink;

/// result of closing one buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closure {
    Emitted,
    Dropped,
    Empty,
}

/// routes raw reports to per-entity trajectory buffers and emits a
/// document to the sink whenever a buffer is closed.
///
/// buffers live in an arena of [`EntityLane`]s. a lane released by a closed
/// entity goes on a free list and is reused for the next new entity, so the
/// arena never grows past `max_entities`.
pub struct AggregationCoordinator<S> {
    normalizer: SampleNormalizer,
    policy: SegmentationPolicy,
    encoder: TrajectoryEncoder,
    max_entities: usize,
    close_absent_entities: bool,
    lanes: Vec<EntityLane>,
    free_lanes: Vec<usize>,
    live: HashMap<String, usize>,
    history: HashMap<String, EntityHistory>,
    open_counter: u64,
    stats: AggregationStats,
    sink: S,
}

impl<S: TrajectorySink> AggregationCoordinator<S> {
    pub fn new(config: &AggregatorConfig, sink: S) -> AggregationCoordinator<S> {
        let catalog = PropertyCatalog::with_kind_overrides(&config.property_kinds);
        let interpolation = InterpolationTable::with_overrides(&config.interpolation);
        AggregationCoordinator {
            normalizer: SampleNormalizer::new(catalog),
            policy: SegmentationPolicy::from(config),
            encoder: TrajectoryEncoder::new(interpolation),
            max_entities: config.max_entities.max(1),
            close_absent_entities: config.close_absent_entities,
            lanes: vec![],
            free_lanes: vec![],
            live: HashMap::new(),
            history: HashMap::new(),
            open_counter: 0,
            stats: AggregationStats::default(),
            sink,
        }
    }

    pub fn stats(&self) -> &AggregationStats {
        &self.stats
    }

    /// number of entities with an open trajectory
    pub fn live_entities(&self) -> usize {
        self.live.len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn history(&self, entity_id: &str) -> Option<&EntityHistory> {
        self.history.get(entity_id)
    }

    /// processes one report. rejected reports are counted and logged, they
    /// never stop the coordinator.
    pub fn ingest(&mut self, report: RawPositionReport) -> IngestOutcome {
        self.stats.reports += 1;
        let NormalizedReport {
            sample,
            property_errors,
        } = match self.normalizer.normalize(report) {
            Ok(normalized) => normalized,
            Err(e) => {
                log::debug!("dropping report: {e}");
                self.stats.malformed += 1;
                return IngestOutcome::Malformed;
            }
        };
        for e in property_errors.iter() {
            log::debug!("entity '{}': {e}", sample.entity_id());
        }
        self.stats.property_errors += property_errors.len();

        let entity_id = sample.entity_id().to_string();
        let timestamp = sample.timestamp();
        let lane = self.live.get(&entity_id).copied();
        let watermark = self.history.get(&entity_id).and_then(|h| h.watermark);
        if let Some(watermark) = watermark {
            if timestamp < watermark {
                log::debug!(
                    "dropping out of order report of '{entity_id}' at {timestamp}, latest is {watermark}"
                );
                self.stats.out_of_order += 1;
                return IngestOutcome::OutOfOrder;
            }
            if timestamp == watermark && lane.is_none() {
                log::debug!("dropping already emitted report of '{entity_id}' at {timestamp}");
                self.stats.stale_duplicates += 1;
                return IngestOutcome::StaleDuplicate;
            }
        }

        let outcome = match lane {
            None => {
                let index = self.open_lane(&entity_id);
                self.append(index, sample)
            }
            Some(index) => {
                let buffer = &self.lanes[index].buffer;
                let replaces_last = buffer.last().is_some_and(|l| l.timestamp() == timestamp);
                // a replacement is judged against the sample it would follow
                let decision = match (replaces_last, buffer.penultimate()) {
                    (true, Some(previous)) => {
                        self.policy
                            .decide_following(previous, buffer.len() - 1, &sample)
                    }
                    (true, None) => SegmentationDecision::Continue,
                    (false, _) => self.policy.decide(buffer, &sample),
                };
                match decision {
                    SegmentationDecision::Continue => self.append(index, sample),
                    SegmentationDecision::StartNew(reason) => {
                        if replaces_last {
                            self.lanes[index].buffer.discard_last();
                            self.stats.duplicates_merged += 1;
                        }
                        // failures are logged and counted by close_buffer
                        let _ = self.close_buffer(index, reason);
                        self.lanes[index].opened = self.next_open();
                        match self.append(index, sample) {
                            IngestOutcome::Appended => IngestOutcome::Rotated(reason),
                            other => other,
                        }
                    }
                }
            }
        };
        if outcome.is_accepted() {
            self.stats.accepted += 1;
            self.history.entry(entity_id).or_default().watermark = Some(timestamp);
        }
        outcome
    }

    /// processes every report of one feed snapshot in order. when configured
    /// to, entities with an open trajectory that are missing from the
    /// snapshot are closed afterwards.
    pub fn ingest_snapshot<I>(&mut self, reports: I) -> Vec<IngestOutcome>
    where
        I: IntoIterator<Item = RawPositionReport>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut outcomes = vec![];
        for report in reports {
            if let Some(entity_id) = report.entity_id.as_deref() {
                seen.insert(entity_id.trim().to_string());
            }
            outcomes.push(self.ingest(report));
        }
        if self.close_absent_entities {
            let absent = self
                .live
                .keys()
                .filter(|e| !seen.contains(*e))
                .cloned()
                .sorted()
                .collect_vec();
            for entity_id in absent {
                log::debug!("entity '{entity_id}' left the feed");
                let _ = self.close_entity(&entity_id, ClosureReason::EntityAbsent);
            }
        }
        outcomes
    }

    /// closes every open trajectory. closeable buffers are emitted, single
    /// samples are discarded. entity history is kept so later trajectories
    /// continue the id sequence.
    pub fn flush(&mut self) -> FlushReport {
        let entities = self.live.keys().cloned().sorted().collect_vec();
        let mut report = FlushReport::default();
        for entity_id in entities {
            match self.close_entity(&entity_id, ClosureReason::Flush) {
                Ok(Closure::Emitted) => report.emitted += 1,
                Ok(Closure::Dropped) => report.dropped += 1,
                Ok(Closure::Empty) => {}
                Err(e) => report.failures.push(e),
            }
        }
        log::debug!(
            "flushed {} trajectories, dropped {}, {} failures",
            report.emitted,
            report.dropped,
            report.failures.len()
        );
        report
    }

    /// flushes and hands back the sink
    pub fn finish(mut self) -> (S, FlushReport) {
        let report = self.flush();
        (self.sink, report)
    }

    fn next_open(&mut self) -> u64 {
        let opened = self.open_counter;
        self.open_counter += 1;
        opened
    }

    fn append(&mut self, index: usize, sample: CanonicalSample) -> IngestOutcome {
        match self.lanes[index].buffer.append(sample) {
            Ok(AppendOutcome::Appended) => IngestOutcome::Appended,
            Ok(AppendOutcome::Replaced) => {
                self.stats.duplicates_merged += 1;
                IngestOutcome::Replaced
            }
            Err(e) => {
                log::debug!("{e}");
                self.stats.out_of_order += 1;
                IngestOutcome::OutOfOrder
            }
        }
    }

    fn open_lane(&mut self, entity_id: &str) -> usize {
        if self.live.len() >= self.max_entities {
            self.evict_oldest();
        }
        let opened = self.next_open();
        let index = match self.free_lanes.pop() {
            Some(index) => {
                let lane = &mut self.lanes[index];
                lane.buffer.reassign(entity_id);
                lane.opened = opened;
                index
            }
            None => {
                self.lanes.push(EntityLane::new(entity_id, opened));
                self.lanes.len() - 1
            }
        };
        self.live.insert(entity_id.to_string(), index);
        index
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .live
            .iter()
            .min_by_key(|(_, index)| self.lanes[**index].opened)
            .map(|(entity_id, _)| entity_id.clone());
        if let Some(entity_id) = oldest {
            log::warn!(
                "reached limit of {} live entities, closing trajectory of '{entity_id}'",
                self.max_entities
            );
            self.stats.evictions += 1;
            let _ = self.close_entity(&entity_id, ClosureReason::EntityEvicted);
        }
    }

    /// closes the entity's buffer and returns its lane to the free list
    fn close_entity(
        &mut self,
        entity_id: &str,
        reason: ClosureReason,
    ) -> Result<Closure, EmissionError> {
        let Some(index) = self.live.remove(entity_id) else {
            return Ok(Closure::Empty);
        };
        let result = self.close_buffer(index, reason);
        self.free_lanes.push(index);
        result
    }

    fn close_buffer(&mut self, index: usize, reason: ClosureReason) -> Result<Closure, EmissionError> {
        let entity_id = self.lanes[index].buffer.entity_id().to_string();
        let samples = self.lanes[index].buffer.drain();
        match samples.len() {
            0 => return Ok(Closure::Empty),
            1 => {
                log::debug!("dropping single-sample trajectory of '{entity_id}' ({reason})");
                self.stats.short_trajectories_dropped += 1;
                return Ok(Closure::Dropped);
            }
            _ => {}
        }

        let trajectory_id = self
            .history
            .get(&entity_id)
            .map(|h| h.next_trajectory_id)
            .unwrap_or_default();
        let document = match self.encoder.encode(&samples, trajectory_id) {
            Ok(document) => document,
            Err(source) => {
                let error = EmissionError::EncodingError {
                    entity_id,
                    samples: samples.len(),
                    source,
                };
                log::error!("{error}");
                self.stats.encoding_failures += 1;
                return Err(error);
            }
        };
        if let Err(source) = self.sink.emit(document) {
            let error = EmissionError::SinkError { entity_id, source };
            log::error!("{error}");
            self.stats.sink_failures += 1;
            return Err(error);
        }
        log::debug!(
            "closed trajectory {trajectory_id} of '{entity_id}' with {} samples ({reason})",
            samples.len()
        );
        self.history.entry(entity_id).or_default().next_trajectory_id = trajectory_id + 1;
        self.stats.trajectories_emitted += 1;
        Ok(Closure::Emitted)
    }
}
