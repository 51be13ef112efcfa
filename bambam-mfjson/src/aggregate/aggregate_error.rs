use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum AggregateError {
    #[error("data directory {0} does not contain a raw trajectory directory")]
    MissingRawDirectory(PathBuf),
    #[error("failure accessing {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failure serializing aggregated trajectories for {path}: {source}")]
    SerializationError {
        path: PathBuf,
        source: serde_json::Error,
    },
}
