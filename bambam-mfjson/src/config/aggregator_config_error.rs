#[derive(thiserror::Error, Debug)]
pub enum AggregatorConfigError {
    #[error("{msg}: {source}")]
    ConfigReadError {
        msg: String,
        source: config::ConfigError,
    },
    #[error("invalid value for '{name}': {msg}")]
    InvalidValue { name: String, msg: String },
}
