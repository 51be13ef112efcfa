use std::path::PathBuf;

use crate::model::encoding::EncodingError;

#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    #[error("failure writing trajectory file {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    EncodingError(#[from] EncodingError),
    #[error("trajectory receiver has hung up, document for entity '{entity_id}' was not delivered")]
    Disconnected { entity_id: String },
    #[error("cannot place document in output directory: {0}")]
    InvalidDocument(String),
}
