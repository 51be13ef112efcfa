use super::MfjsonOperation;
use clap::Parser;

/// command line tool that aggregates real-time vehicle positions into
/// MF-JSON moving-feature trajectories
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct MfjsonApp {
    /// select the operation to run
    #[command(subcommand)]
    pub op: MfjsonOperation,
}
