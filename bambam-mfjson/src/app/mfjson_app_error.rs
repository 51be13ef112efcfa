use crate::aggregate::AggregateError;
use crate::config::AggregatorConfigError;

#[derive(thiserror::Error, Debug)]
pub enum MfjsonAppError {
    #[error(transparent)]
    ConfigurationError(#[from] AggregatorConfigError),
    #[error(transparent)]
    AggregateError(#[from] AggregateError),
    #[error("failure reading position reports from {input}: {source}")]
    ReadError {
        input: String,
        source: std::io::Error,
    },
    #[error("trajectory writer thread stopped unexpectedly")]
    WriterError,
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
