#[derive(thiserror::Error, Debug)]
pub enum EncodingError {
    #[error("trajectory for entity '{entity_id}' has {count} sample(s), at least 2 are required")]
    InsufficientSamples { entity_id: String, count: usize },
    #[error("trajectory for entity '{expected}' contains a sample of entity '{found}'")]
    MixedEntities { expected: String, found: String },
    #[error("measure '{measure}' of entity '{entity_id}' has {values} values for {datetimes} datetimes")]
    LengthMismatch {
        entity_id: String,
        measure: String,
        values: usize,
        datetimes: usize,
    },
    #[error("failure serializing trajectory document: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },
}
