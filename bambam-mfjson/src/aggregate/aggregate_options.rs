use std::fmt::Display;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// which route days to aggregate and what to do with existing files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateOptions {
    pub route_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// remove the raw files that went into a written aggregate
    pub delete_raw_files: bool,
    /// replace an existing aggregate
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayOutcome {
    Written { path: PathBuf, features: usize },
    Skipped(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSummary {
    pub written: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Display for AggregationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "route days written: {}, failed: {}, skipped: {}",
            self.written, self.failed, self.skipped
        )
    }
}
