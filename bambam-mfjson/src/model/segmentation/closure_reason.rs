use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// why an entity's in-progress trajectory was closed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ClosureReason {
    /// a new scheduled trip began
    TripChanged,
    /// the vehicle reversed direction
    DirectionChanged,
    /// the trip was canceled or removed
    TerminalScheduleRelationship,
    /// the gap since the last sample suggests tracking was lost
    IdleGap,
    /// the trajectory reached the configured sample cap
    MaxSamples,
    /// the entity was removed to stay under the live entity cap
    EntityEvicted,
    /// the entity no longer appears in the feed
    EntityAbsent,
    /// explicit flush or shutdown
    Flush,
}

impl Display for ClosureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ClosureReason::TripChanged => "trip changed",
            ClosureReason::DirectionChanged => "direction changed",
            ClosureReason::TerminalScheduleRelationship => "terminal schedule relationship",
            ClosureReason::IdleGap => "idle gap",
            ClosureReason::MaxSamples => "max samples",
            ClosureReason::EntityEvicted => "entity evicted",
            ClosureReason::EntityAbsent => "entity absent from feed",
            ClosureReason::Flush => "flush",
        };
        write!(f, "{s}")
    }
}
