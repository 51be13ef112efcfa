use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::AggregatorConfigError;
use crate::model::interpolation::Interpolation;
use crate::model::sample::ValueKind;

/// prefix of environment variables that override file settings,
/// e.g. `BAMBAM_MFJSON_MAX_IDLE_SECONDS=600`
pub const ENV_PREFIX: &str = "BAMBAM_MFJSON";

/// behaviors of trajectory aggregation. every field has a default so a
/// configuration file only lists what it changes.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct AggregatorConfig {
    /// a gap between consecutive samples longer than this closes the trajectory
    pub max_idle_seconds: i64,
    pub max_samples: usize,
    /// live entities per coordinator before the oldest buffer is evicted
    pub max_entities: usize,
    /// schedule relationships that end a trajectory when a vehicle enters them
    pub terminal_schedule_relationships: Vec<String>,
    pub split_on_direction_change: bool,
    /// close entities missing from a feed snapshot
    pub close_absent_entities: bool,
    /// number of coordinator shards run in parallel
    pub lanes: usize,
    pub interpolation: BTreeMap<String, Interpolation>,
    pub property_kinds: BTreeMap<String, ValueKind>,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_idle_seconds: 900,
            max_samples: 1000,
            max_entities: 1000,
            terminal_schedule_relationships: ["CANCELED", "DELETED", "3", "7"]
                .into_iter()
                .map(String::from)
                .collect(),
            split_on_direction_change: true,
            close_absent_entities: false,
            lanes: 1,
            interpolation: BTreeMap::new(),
            property_kinds: BTreeMap::new(),
        }
    }
}

impl AggregatorConfig {
    /// reads configuration from an optional TOML or JSON file, with
    /// `BAMBAM_MFJSON_*` environment variables taking precedence.
    pub fn load(file: Option<&Path>) -> Result<AggregatorConfig, AggregatorConfigError> {
        Self::load_with_env_prefix(file, ENV_PREFIX)
    }

    pub fn load_with_env_prefix(
        file: Option<&Path>,
        env_prefix: &str,
    ) -> Result<AggregatorConfig, AggregatorConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let environment = config::Environment::with_prefix(env_prefix)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("terminal_schedule_relationships");
        let source = file
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| String::from("<defaults>"));
        let config = builder
            .add_source(environment)
            .build()
            .map_err(|e| AggregatorConfigError::ConfigReadError {
                msg: format!("failed reading aggregator configuration '{source}'"),
                source: e,
            })?;
        let result: AggregatorConfig =
            config
                .try_deserialize()
                .map_err(|e| AggregatorConfigError::ConfigReadError {
                    msg: format!("failed decoding aggregator configuration '{source}'"),
                    source: e,
                })?;
        result.validate()?;
        Ok(result)
    }

    pub fn validate(&self) -> Result<(), AggregatorConfigError> {
        let invalid = |name: &str, msg: &str| {
            Err(AggregatorConfigError::InvalidValue {
                name: name.to_string(),
                msg: msg.to_string(),
            })
        };
        if self.max_idle_seconds <= 0 {
            return invalid("max_idle_seconds", "must be positive");
        }
        if self.max_samples == 0 {
            return invalid("max_samples", "must be at least 1");
        }
        if self.max_entities == 0 {
            return invalid("max_entities", "must be at least 1");
        }
        if self.lanes == 0 {
            return invalid("lanes", "must be at least 1");
        }
        Ok(())
    }

    pub fn max_idle(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_idle_seconds)
    }
}
