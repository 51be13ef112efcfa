use super::ValueKind;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("malformed report for entity '{entity_id}': {reason}")]
    MalformedReport { entity_id: String, reason: String },
    #[error("property '{name}' expected a {expected} value, found {found}")]
    PropertyTypeError {
        name: String,
        expected: ValueKind,
        found: String,
    },
}

impl NormalizeError {
    pub fn malformed(entity_id: Option<&str>, reason: impl Into<String>) -> NormalizeError {
        NormalizeError::MalformedReport {
            entity_id: entity_id.unwrap_or("<unknown>").to_string(),
            reason: reason.into(),
        }
    }
}
