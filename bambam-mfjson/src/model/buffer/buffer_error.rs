use chrono::{DateTime, Utc};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BufferError {
    #[error("sample for entity '{entity_id}' at {timestamp} precedes the last buffered sample at {last}")]
    OutOfOrderSample {
        entity_id: String,
        timestamp: DateTime<Utc>,
        last: DateTime<Utc>,
    },
    #[error("buffer for entity '{expected}' cannot accept a sample of entity '{found}'")]
    EntityMismatch { expected: String, found: String },
}
