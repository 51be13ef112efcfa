use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::mpsc;

use serde_json::Value;

use super::MfjsonAppError;
use crate::config::AggregatorConfig;
use crate::model::coordinator::{AggregationStats, LanePool};
use crate::model::encoding::TrajectoryDocument;
use crate::model::report::RawPositionReport;
use crate::model::sink::{ChannelSink, DirectorySink, TrajectorySink};

/// outcome of one ingest run
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSummary {
    pub stats: AggregationStats,
    pub files_written: usize,
    pub write_failures: usize,
    pub flush_failures: usize,
}

impl Display for IngestSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, files written: {}, write failures: {}, flush failures: {}",
            self.stats, self.files_written, self.write_failures, self.flush_failures
        )
    }
}

/// reads newline-delimited reports from `input` (a file path or `-` for
/// stdin) and writes every closed trajectory below `output_directory`.
///
/// a line holding a JSON object is one report; these are grouped into
/// snapshots of `snapshot_size` lines. a line holding a JSON array is one
/// complete feed snapshot. lines that are not JSON, and array elements that
/// are not reports, are counted as malformed. documents are written by a
/// separate thread fed through a channel. all open trajectories are flushed
/// at the end of input.
pub fn run_ingest(
    input: &str,
    output_directory: &Path,
    configuration_file: Option<&Path>,
    snapshot_size: usize,
) -> Result<IngestSummary, MfjsonAppError> {
    let config = AggregatorConfig::load(configuration_file)?;
    log::info!(
        "aggregating reports from {input} into {} with {} lanes",
        output_directory.display(),
        config.lanes
    );
    let reader: Box<dyn BufRead> = if input == "-" {
        Box::new(std::io::stdin().lock())
    } else {
        let file = File::open(input).map_err(|source| MfjsonAppError::ReadError {
            input: input.to_string(),
            source,
        })?;
        Box::new(BufReader::new(file))
    };

    let (sender, receiver) = mpsc::channel::<TrajectoryDocument>();
    let writer_root = output_directory.to_path_buf();
    let writer = std::thread::spawn(move || {
        let mut sink = DirectorySink::new(&writer_root);
        let mut failures = 0;
        for document in receiver {
            if let Err(e) = sink.emit(document) {
                log::error!("{e}");
                failures += 1;
            }
        }
        (sink.written(), failures)
    });

    let mut pool = LanePool::new(&config, |_| ChannelSink::new(sender.clone()));
    drop(sender);

    let mut malformed_lines = 0;
    let read_result = ingest_lines(reader, &mut pool, snapshot_size, &mut malformed_lines);

    // open trajectories are flushed and written even when reading failed
    let (sinks, flush, mut stats) = pool.finish();
    for failure in flush.failures.iter() {
        log::error!("{failure}");
    }
    // closing the last senders ends the writer loop
    drop(sinks);
    let (files_written, write_failures) = writer.join().map_err(|_| MfjsonAppError::WriterError)?;

    read_result.map_err(|source| MfjsonAppError::ReadError {
        input: input.to_string(),
        source,
    })?;

    stats.reports += malformed_lines;
    stats.malformed += malformed_lines;
    Ok(IngestSummary {
        stats,
        files_written,
        write_failures,
        flush_failures: flush.failures.len(),
    })
}

/// feeds every line of `reader` to the pool. lines are read as raw bytes so
/// that a line which is not UTF-8 or not JSON only counts as malformed.
/// stops at the first I/O error, after handing the pending batch to the pool.
fn ingest_lines<R, S>(
    mut reader: R,
    pool: &mut LanePool<S>,
    snapshot_size: usize,
    malformed_lines: &mut usize,
) -> Result<(), std::io::Error>
where
    R: BufRead,
    S: TrajectorySink + Send,
{
    let mut line: Vec<u8> = vec![];
    let mut line_number = 0;
    let mut batch: Vec<RawPositionReport> = Vec::with_capacity(snapshot_size);
    let result = loop {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break Ok(()),
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => break Err(e),
        }
        line_number += 1;
        let content = trim_ascii_whitespace(&line);
        if content.is_empty() {
            continue;
        }
        match serde_json::from_slice::<Value>(content) {
            Ok(Value::Array(elements)) => {
                if !batch.is_empty() {
                    pool.ingest_snapshot(std::mem::take(&mut batch));
                }
                let mut snapshot = Vec::with_capacity(elements.len());
                for element in elements {
                    match serde_json::from_value::<RawPositionReport>(element) {
                        Ok(report) => snapshot.push(report),
                        Err(e) => {
                            log::debug!("line {line_number}: skipping snapshot element: {e}");
                            *malformed_lines += 1;
                        }
                    }
                }
                pool.ingest_snapshot(snapshot);
            }
            Ok(value) => match serde_json::from_value::<RawPositionReport>(value) {
                Ok(report) => {
                    batch.push(report);
                    if batch.len() >= snapshot_size {
                        pool.ingest_snapshot(std::mem::take(&mut batch));
                    }
                }
                Err(e) => {
                    log::debug!("line {line_number}: not a position report: {e}");
                    *malformed_lines += 1;
                }
            },
            Err(e) => {
                log::debug!("line {line_number}: invalid JSON: {e}");
                *malformed_lines += 1;
            }
        }
    };
    if !batch.is_empty() {
        pool.ingest_snapshot(batch);
    }
    result
}

fn trim_ascii_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
