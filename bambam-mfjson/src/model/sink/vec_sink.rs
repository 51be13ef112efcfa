use super::{SinkError, TrajectorySink};
use crate::model::encoding::TrajectoryDocument;

/// collects documents in memory in emission order.
#[derive(Debug, Default)]
pub struct VecSink {
    documents: Vec<TrajectoryDocument>,
}

impl VecSink {
    pub fn documents(&self) -> &[TrajectoryDocument] {
        &self.documents
    }

    pub fn into_documents(self) -> Vec<TrajectoryDocument> {
        self.documents
    }
}

impl TrajectorySink for VecSink {
    fn emit(&mut self, document: TrajectoryDocument) -> Result<(), SinkError> {
        self.documents.push(document);
        Ok(())
    }
}
