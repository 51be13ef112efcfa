mod buffer_error;
mod trajectory_buffer;

pub use buffer_error::BufferError;
pub use trajectory_buffer::{AppendOutcome, TrajectoryBuffer};
