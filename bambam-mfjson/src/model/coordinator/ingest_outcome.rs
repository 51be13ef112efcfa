use crate::model::segmentation::ClosureReason;

/// what happened to one raw report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// added to the entity's open trajectory, or opened a new one
    Appended,
    /// overwrote a buffered sample with the same timestamp
    Replaced,
    /// closed the open trajectory and started a new one with this sample
    Rotated(ClosureReason),
    Malformed,
    OutOfOrder,
    /// repeats the timestamp of a sample that was already emitted
    StaleDuplicate,
}

impl IngestOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            IngestOutcome::Appended | IngestOutcome::Replaced | IngestOutcome::Rotated(_)
        )
    }
}
