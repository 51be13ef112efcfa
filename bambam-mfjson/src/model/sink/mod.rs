//! destinations for closed trajectory documents.
mod channel_sink;
mod directory_sink;
mod route_partition;
mod sink_error;
mod trajectory_sink;
mod vec_sink;

pub use channel_sink::ChannelSink;
pub use directory_sink::{DirectorySink, RAW_STAGE};
pub use route_partition::{sanitize_path_component, RoutePartition, UNKNOWN_ROUTE};
pub use sink_error::SinkError;
pub use trajectory_sink::TrajectorySink;
pub use vec_sink::VecSink;
