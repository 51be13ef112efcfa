use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// running counters of a coordinator
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub reports: usize,
    pub accepted: usize,
    pub malformed: usize,
    pub property_errors: usize,
    pub out_of_order: usize,
    /// same-timestamp samples merged into the open trajectory
    pub duplicates_merged: usize,
    pub stale_duplicates: usize,
    pub short_trajectories_dropped: usize,
    pub trajectories_emitted: usize,
    pub encoding_failures: usize,
    pub sink_failures: usize,
    pub evictions: usize,
}

impl AggregationStats {
    pub fn merge(&self, other: &AggregationStats) -> AggregationStats {
        AggregationStats {
            reports: self.reports + other.reports,
            accepted: self.accepted + other.accepted,
            malformed: self.malformed + other.malformed,
            property_errors: self.property_errors + other.property_errors,
            out_of_order: self.out_of_order + other.out_of_order,
            duplicates_merged: self.duplicates_merged + other.duplicates_merged,
            stale_duplicates: self.stale_duplicates + other.stale_duplicates,
            short_trajectories_dropped: self.short_trajectories_dropped
                + other.short_trajectories_dropped,
            trajectories_emitted: self.trajectories_emitted + other.trajectories_emitted,
            encoding_failures: self.encoding_failures + other.encoding_failures,
            sink_failures: self.sink_failures + other.sink_failures,
            evictions: self.evictions + other.evictions,
        }
    }
}

impl Display for AggregationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "reports: {}, accepted: {}, malformed: {}, property errors: {}, out of order: {}, \
             duplicates merged: {}, stale duplicates: {}, short trajectories dropped: {}, \
             trajectories emitted: {}, encoding failures: {}, sink failures: {}, evictions: {}",
            self.reports,
            self.accepted,
            self.malformed,
            self.property_errors,
            self.out_of_order,
            self.duplicates_merged,
            self.stale_duplicates,
            self.short_trajectories_dropped,
            self.trajectories_emitted,
            self.encoding_failures,
            self.sink_failures,
            self.evictions
        )
    }
}
