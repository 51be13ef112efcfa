use chrono::{DateTime, Utc};

/// what a coordinator remembers about an entity between trajectories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityHistory {
    /// id given to the next emitted trajectory
    pub next_trajectory_id: u64,
    /// latest accepted sample timestamp
    pub watermark: Option<DateTime<Utc>>,
}
