//! combines the raw per-trajectory files of one route and day into a single
//! MF-JSON FeatureCollection.
mod aggregate_error;
mod aggregate_options;
mod daily_aggregation;

pub use aggregate_error::AggregateError;
pub use aggregate_options::{AggregateOptions, AggregationSummary, DayOutcome};
pub use daily_aggregation::{aggregate_all, aggregate_day, find_route_days, AGGREGATED_FILENAME, AGGREGATED_STAGE};
