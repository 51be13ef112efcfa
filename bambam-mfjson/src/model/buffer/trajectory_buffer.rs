use chrono::{DateTime, Utc};

use super::BufferError;
use crate::model::sample::CanonicalSample;

/// result of a successful [`TrajectoryBuffer::append`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// the sample had the same timestamp as the last one and overwrote it
    Replaced,
}

/// time-ordered samples of one in-progress trajectory. holds no policy of
/// its own; segmentation is decided by the caller.
#[derive(Debug, Default)]
pub struct TrajectoryBuffer {
    entity_id: String,
    samples: Vec<CanonicalSample>,
}

impl TrajectoryBuffer {
    pub fn new(entity_id: &str) -> TrajectoryBuffer {
        TrajectoryBuffer {
            entity_id: entity_id.to_string(),
            samples: vec![],
        }
    }

    /// clears the buffer and assigns it to another entity, keeping the
    /// allocated sample storage.
    pub fn reassign(&mut self, entity_id: &str) {
        self.samples.clear();
        self.entity_id.clear();
        self.entity_id.push_str(entity_id);
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn append(&mut self, sample: CanonicalSample) -> Result<AppendOutcome, BufferError> {
        if sample.entity_id() != self.entity_id {
            return Err(BufferError::EntityMismatch {
                expected: self.entity_id.clone(),
                found: sample.entity_id().to_string(),
            });
        }
        if self.samples.is_empty() {
            self.samples.push(sample);
            return Ok(AppendOutcome::Appended);
        }
        let last_index = self.samples.len() - 1;
        let last = &mut self.samples[last_index];
        if sample.timestamp() < last.timestamp() {
            return Err(BufferError::OutOfOrderSample {
                entity_id: self.entity_id.clone(),
                timestamp: sample.timestamp(),
                last: last.timestamp(),
            });
        }
        if sample.timestamp() == last.timestamp() {
            *last = sample;
            return Ok(AppendOutcome::Replaced);
        }
        self.samples.push(sample);
        Ok(AppendOutcome::Appended)
    }

    /// a trajectory needs at least two points to carry an interpolated geometry
    pub fn is_closeable(&self) -> bool {
        self.samples.len() >= 2
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&CanonicalSample> {
        self.samples.last()
    }

    /// the sample before the last one
    pub fn penultimate(&self) -> Option<&CanonicalSample> {
        self.samples.len().checked_sub(2).map(|i| &self.samples[i])
    }

    pub fn discard_last(&mut self) -> Option<CanonicalSample> {
        self.samples.pop()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.samples.first().map(|s| s.timestamp())
    }

    /// removes and returns all samples in order, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<CanonicalSample> {
        self.samples.drain(..).collect()
    }
}

#[cfg(test)]
mod test {
    use super::{AppendOutcome, TrajectoryBuffer};
    use crate::model::buffer::BufferError;
    use crate::model::test_util::sample;

    #[test]
    fn test_append_in_order() {
        let mut buffer = TrajectoryBuffer::new("y1858");
        assert!(!buffer.is_closeable());
        let first = buffer.append(sample("y1858", "04:44:50", "t")).unwrap();
        assert_eq!(first, AppendOutcome::Appended);
        assert!(!buffer.is_closeable());
        buffer.append(sample("y1858", "04:45:07", "t")).unwrap();
        assert!(buffer.is_closeable());
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn test_out_of_order_leaves_buffer_untouched() {
        let mut buffer = TrajectoryBuffer::new("y1858");
        buffer.append(sample("y1858", "04:45:07", "t")).unwrap();
        let result = buffer.append(sample("y1858", "04:44:50", "t"));
        assert!(matches!(result, Err(BufferError::OutOfOrderSample { .. })));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_duplicate_timestamp_overwrites() {
        let mut buffer = TrajectoryBuffer::new("y1858");
        buffer.append(sample("y1858", "04:44:50", "a")).unwrap();
        let outcome = buffer.append(sample("y1858", "04:44:50", "b")).unwrap();
        assert_eq!(outcome, AppendOutcome::Replaced);
        assert_eq!(buffer.len(), 1);
        let trip = buffer.last().and_then(|s| s.attribute("trip_id")).unwrap();
        assert_eq!(trip.to_string(), "b");
    }

    #[test]
    fn test_penultimate_and_discard_last() {
        let mut buffer = TrajectoryBuffer::new("y1858");
        buffer.append(sample("y1858", "04:44:50", "a")).unwrap();
        assert!(buffer.penultimate().is_none());
        buffer.append(sample("y1858", "04:45:07", "b")).unwrap();
        let previous = buffer.penultimate().and_then(|s| s.attribute("trip_id")).unwrap();
        assert_eq!(previous.to_string(), "a");
        let dropped = buffer.discard_last().unwrap();
        assert_eq!(dropped.attribute("trip_id").unwrap().to_string(), "b");
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_rejects_other_entity() {
        let mut buffer = TrajectoryBuffer::new("y1858");
        let result = buffer.append(sample("y1857", "04:44:50", "a"));
        assert!(matches!(result, Err(BufferError::EntityMismatch { .. })));
    }

    #[test]
    fn test_drain_resets() {
        let mut buffer = TrajectoryBuffer::new("y1858");
        buffer.append(sample("y1858", "04:44:50", "t")).unwrap();
        buffer.append(sample("y1858", "04:45:07", "t")).unwrap();
        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert!(drained[0].timestamp() < drained[1].timestamp());
        assert!(buffer.is_empty());
        buffer.append(sample("y1858", "04:40:00", "t")).unwrap();
        assert_eq!(buffer.len(), 1);
    }
}
