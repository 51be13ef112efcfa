use crate::model::encoding::EncodingError;
use crate::model::sink::SinkError;

/// failure to produce or deliver the document of one closed trajectory
#[derive(thiserror::Error, Debug)]
pub enum EmissionError {
    #[error("failure encoding trajectory of entity '{entity_id}' with {samples} samples: {source}")]
    EncodingError {
        entity_id: String,
        samples: usize,
        source: EncodingError,
    },
    #[error("failure emitting trajectory of entity '{entity_id}': {source}")]
    SinkError { entity_id: String, source: SinkError },
}

impl EmissionError {
    pub fn entity_id(&self) -> &str {
        match self {
            EmissionError::EncodingError { entity_id, .. } => entity_id,
            EmissionError::SinkError { entity_id, .. } => entity_id,
        }
    }
}
