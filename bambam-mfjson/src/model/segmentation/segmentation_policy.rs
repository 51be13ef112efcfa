use std::collections::HashSet;

use chrono::Duration;

use super::ClosureReason;
use crate::config::AggregatorConfig;
use crate::model::buffer::TrajectoryBuffer;
use crate::model::sample::{property_names as names, CanonicalSample, PropertyValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationDecision {
    Continue,
    StartNew(ClosureReason),
}

/// decides whether an incoming sample continues the entity's current
/// trajectory or closes it and starts a new one.
#[derive(Debug, Clone)]
pub struct SegmentationPolicy {
    max_idle: Duration,
    max_samples: usize,
    terminal_schedule_relationships: HashSet<String>,
    split_on_direction_change: bool,
}

impl From<&AggregatorConfig> for SegmentationPolicy {
    fn from(config: &AggregatorConfig) -> Self {
        SegmentationPolicy::new(
            config.max_idle(),
            config.max_samples,
            config.terminal_schedule_relationships.iter().cloned(),
            config.split_on_direction_change,
        )
    }
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        SegmentationPolicy::from(&AggregatorConfig::default())
    }
}

impl SegmentationPolicy {
    pub fn new(
        max_idle: Duration,
        max_samples: usize,
        terminal_schedule_relationships: impl IntoIterator<Item = String>,
        split_on_direction_change: bool,
    ) -> SegmentationPolicy {
        SegmentationPolicy {
            max_idle,
            max_samples: max_samples.max(1),
            terminal_schedule_relationships: terminal_schedule_relationships
                .into_iter()
                .map(|s| s.trim().to_uppercase())
                .collect(),
            split_on_direction_change,
        }
    }

    /// tests the triggers in order: trip change, direction change, terminal
    /// schedule relationship, idle gap, sample cap. the first match wins.
    /// an empty buffer always continues.
    pub fn decide(&self, buffer: &TrajectoryBuffer, sample: &CanonicalSample) -> SegmentationDecision {
        match buffer.last() {
            Some(last) => self.decide_following(last, buffer.len(), sample),
            None => SegmentationDecision::Continue,
        }
    }

    /// decides against a trajectory of `len` samples ending in `previous`.
    /// used directly when `sample` replaces the buffer's last sample, in which
    /// case `previous` is the sample before it.
    pub fn decide_following(
        &self,
        previous: &CanonicalSample,
        len: usize,
        sample: &CanonicalSample,
    ) -> SegmentationDecision {
        if changed(previous, sample, names::TRIP_ID) {
            return SegmentationDecision::StartNew(ClosureReason::TripChanged);
        }
        if self.split_on_direction_change && changed(previous, sample, names::DIRECTION_ID) {
            return SegmentationDecision::StartNew(ClosureReason::DirectionChanged);
        }
        if !self.is_terminal(previous) && self.is_terminal(sample) {
            return SegmentationDecision::StartNew(ClosureReason::TerminalScheduleRelationship);
        }
        if sample.timestamp() - previous.timestamp() > self.max_idle {
            return SegmentationDecision::StartNew(ClosureReason::IdleGap);
        }
        if len >= self.max_samples {
            return SegmentationDecision::StartNew(ClosureReason::MaxSamples);
        }
        SegmentationDecision::Continue
    }

    fn is_terminal(&self, sample: &CanonicalSample) -> bool {
        sample
            .property(names::SCHEDULE_RELATIONSHIP)
            .map(|v| {
                self.terminal_schedule_relationships
                    .contains(&v.to_string().trim().to_uppercase())
            })
            .unwrap_or(false)
    }
}

/// a property only counts as changed when both samples report it
fn changed(last: &CanonicalSample, next: &CanonicalSample, name: &str) -> bool {
    match (last.property(name), next.property(name)) {
        (Some(a), Some(b)) => !same_value(a, b),
        _ => false,
    }
}

/// integer and text encodings of the same identifier compare equal
fn same_value(a: &PropertyValue, b: &PropertyValue) -> bool {
    a == b || a.to_string() == b.to_string()
}
