use super::SinkError;
use crate::model::encoding::TrajectoryDocument;

/// receives each document as soon as its trajectory is closed. a failure
/// affects only that one document.
pub trait TrajectorySink {
    fn emit(&mut self, document: TrajectoryDocument) -> Result<(), SinkError>;
}

impl<S: TrajectorySink + ?Sized> TrajectorySink for Box<S> {
    fn emit(&mut self, document: TrajectoryDocument) -> Result<(), SinkError> {
        (**self).emit(document)
    }
}
