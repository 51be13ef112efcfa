mod aggregation_coordinator;
mod aggregation_stats;
mod emission_error;
mod entity_history;
mod entity_lane;
mod flush_report;
mod ingest_outcome;
mod lane_pool;

pub use aggregation_coordinator::AggregationCoordinator;
pub use aggregation_stats::AggregationStats;
pub use emission_error::EmissionError;
pub use entity_history::EntityHistory;
pub use entity_lane::EntityLane;
pub use flush_report::FlushReport;
pub use ingest_outcome::IngestOutcome;
pub use lane_pool::LanePool;
