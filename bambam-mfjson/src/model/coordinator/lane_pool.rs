use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rayon::prelude::*;

use super::{AggregationCoordinator, AggregationStats, FlushReport};
use crate::config::AggregatorConfig;
use crate::model::report::RawPositionReport;
use crate::model::sink::TrajectorySink;

/// a fixed set of coordinators run in parallel. each entity id hashes to
/// exactly one shard, so shards share no state and the reports of one entity
/// are always processed by the same shard in arrival order.
pub struct LanePool<S> {
    shards: Vec<AggregationCoordinator<S>>,
}

impl<S> LanePool<S>
where
    S: TrajectorySink + Send,
{
    /// builds `config.lanes` shards, each with the sink returned by
    /// `make_sink` for its shard index.
    pub fn new<F>(config: &AggregatorConfig, make_sink: F) -> LanePool<S>
    where
        F: Fn(usize) -> S,
    {
        let shards = (0..config.lanes.max(1))
            .map(|index| AggregationCoordinator::new(config, make_sink(index)))
            .collect();
        LanePool { shards }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// the shard owning an entity id. reports without an id go to shard 0
    /// where they are counted as malformed.
    pub fn shard_of(&self, entity_id: Option<&str>) -> usize {
        match entity_id {
            Some(id) => {
                let mut hasher = DefaultHasher::new();
                id.trim().hash(&mut hasher);
                (hasher.finish() % self.shards.len() as u64) as usize
            }
            None => 0,
        }
    }

    fn partition(&self, reports: Vec<RawPositionReport>) -> Vec<Vec<RawPositionReport>> {
        let mut batches: Vec<Vec<RawPositionReport>> = vec![vec![]; self.shards.len()];
        for report in reports {
            let shard = self.shard_of(report.entity_id.as_deref());
            batches[shard].push(report);
        }
        batches
    }

    /// processes a batch of reports without treating it as a full snapshot
    pub fn ingest(&mut self, reports: Vec<RawPositionReport>) {
        let batches = self.partition(reports);
        self.shards
            .par_iter_mut()
            .zip(batches.into_par_iter())
            .for_each(|(shard, batch)| {
                for report in batch {
                    shard.ingest(report);
                }
            });
    }

    /// processes one full feed snapshot, see
    /// [`AggregationCoordinator::ingest_snapshot`]. every shard sees its
    /// share of the snapshot, possibly empty.
    pub fn ingest_snapshot(&mut self, reports: Vec<RawPositionReport>) {
        let batches = self.partition(reports);
        self.shards
            .par_iter_mut()
            .zip(batches.into_par_iter())
            .for_each(|(shard, batch)| {
                shard.ingest_snapshot(batch);
            });
    }

    pub fn stats(&self) -> AggregationStats {
        self.shards
            .iter()
            .fold(AggregationStats::default(), |acc, s| acc.merge(s.stats()))
    }

    pub fn live_entities(&self) -> usize {
        self.shards.iter().map(|s| s.live_entities()).sum()
    }

    pub fn flush(&mut self) -> FlushReport {
        self.shards
            .par_iter_mut()
            .map(|shard| shard.flush())
            .reduce(FlushReport::default, FlushReport::merge)
    }

    /// flushes every shard and returns the sinks in shard order along with
    /// the combined flush report and counters.
    pub fn finish(mut self) -> (Vec<S>, FlushReport, AggregationStats) {
        let report = self.flush();
        let stats = self.stats();
        let sinks = self
            .shards
            .into_iter()
            .map(|shard| shard.finish().0)
            .collect();
        (sinks, report, stats)
    }
}

#[cfg(test)]
mod test {
    use super::LanePool;
    use crate::config::AggregatorConfig;
    use crate::model::coordinator::AggregationCoordinator;
    use crate::model::encoding::TrajectoryDocument;
    use crate::model::report::RawPositionReport;
    use crate::model::sink::VecSink;
    use crate::model::test_util::report;
    use itertools::Itertools;

    fn reports() -> Vec<RawPositionReport> {
        let mut reports = vec![];
        for (i, t) in ["04:00:00", "04:00:20", "04:00:40", "04:01:00"].iter().enumerate() {
            for entity in ["y1855", "y1856", "y1857", "y1858", "y1859", "y1860"] {
                let trip = if i < 3 { "a" } else { "b" };
                reports.push(report(entity, t, trip));
            }
        }
        reports
    }

    fn by_entity(docs: Vec<TrajectoryDocument>) -> Vec<String> {
        docs.iter()
            .map(|d| d.to_json().unwrap())
            .sorted()
            .collect()
    }

    #[test]
    fn test_pool_matches_single_coordinator() {
        let mut single = AggregationCoordinator::new(&AggregatorConfig::default(), VecSink::default());
        for r in reports() {
            single.ingest(r);
        }
        let (sink, _) = single.finish();
        let expected = by_entity(sink.into_documents());

        let config = AggregatorConfig {
            lanes: 3,
            ..Default::default()
        };
        let mut pool = LanePool::new(&config, |_| VecSink::default());
        assert_eq!(pool.shard_count(), 3);
        let all = reports();
        let (first, second) = all.split_at(12);
        pool.ingest(first.to_vec());
        pool.ingest(second.to_vec());
        let (sinks, flush, stats) = pool.finish();
        assert!(flush.is_ok());
        assert_eq!(stats.reports, 24);
        let docs = sinks.into_iter().flat_map(|s| s.into_documents()).collect_vec();
        assert_eq!(docs.len(), 6);
        assert_eq!(by_entity(docs), expected);
    }

    #[test]
    fn test_shard_assignment_is_stable() {
        let pool: LanePool<VecSink> = LanePool::new(
            &AggregatorConfig {
                lanes: 4,
                ..Default::default()
            },
            |_| VecSink::default(),
        );
        let shard = pool.shard_of(Some("y1858"));
        assert!(shard < 4);
        assert_eq!(pool.shard_of(Some(" y1858 ")), shard);
        assert_eq!(pool.shard_of(None), 0);
    }

    #[test]
    fn test_snapshot_closes_absent_entities() {
        let config = AggregatorConfig {
            lanes: 2,
            close_absent_entities: true,
            ..Default::default()
        };
        let mut pool = LanePool::new(&config, |_| VecSink::default());
        pool.ingest_snapshot(vec![report("a", "04:00:00", "t"), report("b", "04:00:00", "t")]);
        pool.ingest_snapshot(vec![report("a", "04:00:30", "t"), report("b", "04:00:30", "t")]);
        pool.ingest_snapshot(vec![report("a", "04:01:00", "t")]);
        assert_eq!(pool.live_entities(), 1);
        assert_eq!(pool.stats().trajectories_emitted, 1);
    }
}
