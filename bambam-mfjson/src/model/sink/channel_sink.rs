use std::sync::mpsc::Sender;

use super::{SinkError, TrajectorySink};
use crate::model::encoding::TrajectoryDocument;

/// hands documents to another thread, usually a file writer. sending never
/// blocks, so a slow writer does not hold up intake.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<TrajectoryDocument>,
}

impl ChannelSink {
    pub fn new(sender: Sender<TrajectoryDocument>) -> ChannelSink {
        ChannelSink { sender }
    }
}

impl TrajectorySink for ChannelSink {
    fn emit(&mut self, document: TrajectoryDocument) -> Result<(), SinkError> {
        self.sender.send(document).map_err(|e| SinkError::Disconnected {
            entity_id: e.0.entity_id().unwrap_or_default().to_string(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::ChannelSink;
    use crate::model::encoding::TrajectoryEncoder;
    use crate::model::sink::{SinkError, TrajectorySink};
    use crate::model::test_util::sample;
    use std::sync::mpsc::channel;

    #[test]
    fn test_send_and_disconnect() {
        let samples = vec![
            sample("y1858", "04:44:50", "t"),
            sample("y1858", "04:45:07", "t"),
        ];
        let doc = TrajectoryEncoder::default().encode(&samples, 0).unwrap();
        let (tx, rx) = channel();
        let mut sink = ChannelSink::new(tx);
        sink.emit(doc.clone()).unwrap();
        assert_eq!(rx.recv().unwrap(), doc);
        drop(rx);
        let result = sink.emit(doc);
        assert!(matches!(result, Err(SinkError::Disconnected { entity_id }) if entity_id == "y1858"));
    }
}
