mod closure_reason;
mod segmentation_policy;

pub use closure_reason::ClosureReason;
pub use segmentation_policy::{SegmentationDecision, SegmentationPolicy};
