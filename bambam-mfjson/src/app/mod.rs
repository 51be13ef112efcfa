mod ingest_ops;
mod mfjson_app;
mod mfjson_app_error;
mod operation;

pub use ingest_ops::{run_ingest, IngestSummary};
pub use mfjson_app::MfjsonApp;
pub use mfjson_app_error::MfjsonAppError;
pub use operation::MfjsonOperation;
