mod raw_position_report;
mod raw_timestamp;

pub use raw_position_report::{RawCarriage, RawPositionReport};
pub use raw_timestamp::RawTimestamp;
