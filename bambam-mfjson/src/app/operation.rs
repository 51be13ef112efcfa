use std::path::Path;

use chrono::NaiveDate;
use clap::{value_parser, Subcommand};
use serde::{Deserialize, Serialize};

use super::{ingest_ops, MfjsonAppError};
use crate::aggregate::{self, AggregateOptions};

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum MfjsonOperation {
    /// aggregate newline-delimited JSON position reports into one MF-JSON
    /// file per trajectory
    Ingest {
        /// file of position reports, one JSON object per line, or `-` for stdin.
        /// a line holding a JSON array is treated as one complete feed snapshot.
        #[arg(short, long, default_value_t = String::from("-"))]
        input: String,
        /// root directory receiving `raw/{route}/Year=/Month=/Day=/` partitions
        #[arg(short, long, default_value_t = String::from("."))]
        output_directory: String,
        /// TOML or JSON aggregator configuration
        #[arg(long)]
        configuration_file: Option<String>,
        /// number of single-report lines processed together as one snapshot
        #[arg(long, default_value_t = 1000)]
        snapshot_size: usize,
    },
    /// combine the raw trajectory files of each route and day into one file
    Aggregate {
        /// directory previously written by `ingest`
        #[arg(short, long, default_value_t = String::from("."))]
        data_directory: String,
        /// only aggregate this route
        #[arg(long)]
        route_id: Option<String>,
        /// only aggregate this day, YYYY-MM-DD
        #[arg(long, value_parser = value_parser!(NaiveDate))]
        date: Option<NaiveDate>,
        /// remove raw files once their aggregate is written
        #[arg(long, default_value_t = false)]
        delete_raw_files: bool,
        /// replace existing aggregates
        #[arg(long, default_value_t = false)]
        overwrite: bool,
    },
}

impl MfjsonOperation {
    pub fn run(&self) -> Result<(), MfjsonAppError> {
        match self {
            MfjsonOperation::Ingest {
                input,
                output_directory,
                configuration_file,
                snapshot_size,
            } => {
                if *snapshot_size == 0 {
                    return Err(MfjsonAppError::InvalidArgument(String::from(
                        "snapshot size must be at least 1",
                    )));
                }
                let summary = ingest_ops::run_ingest(
                    input,
                    Path::new(output_directory),
                    configuration_file.as_deref().map(Path::new),
                    *snapshot_size,
                )?;
                log::info!("{summary}");
                Ok(())
            }
            MfjsonOperation::Aggregate {
                data_directory,
                route_id,
                date,
                delete_raw_files,
                overwrite,
            } => {
                let options = AggregateOptions {
                    route_id: route_id.clone(),
                    date: *date,
                    delete_raw_files: *delete_raw_files,
                    overwrite: *overwrite,
                };
                let summary = aggregate::aggregate_all(Path::new(data_directory), &options)?;
                log::info!("{summary}");
                Ok(())
            }
        }
    }
}
