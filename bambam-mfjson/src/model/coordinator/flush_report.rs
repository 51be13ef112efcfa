use super::EmissionError;

/// result of closing every open trajectory. failures are collected per
/// entity instead of stopping the flush.
#[derive(Debug, Default)]
pub struct FlushReport {
    pub emitted: usize,
    /// buffers with a single sample, discarded without a document
    pub dropped: usize,
    pub failures: Vec<EmissionError>,
}

impl FlushReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(mut self, other: FlushReport) -> FlushReport {
        self.emitted += other.emitted;
        self.dropped += other.dropped;
        self.failures.extend(other.failures);
        self
    }
}
