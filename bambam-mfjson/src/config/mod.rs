mod aggregator_config;
mod aggregator_config_error;

pub use aggregator_config::{AggregatorConfig, ENV_PREFIX};
pub use aggregator_config_error::AggregatorConfigError;
