use crate::model::buffer::TrajectoryBuffer;

/// a reusable slot in the coordinator's lane arena holding one entity's
/// open trajectory.
#[derive(Debug, Default)]
pub struct EntityLane {
    pub buffer: TrajectoryBuffer,
    /// value of the coordinator's open counter when the current buffer was
    /// started. the smallest live value is evicted first.
    pub opened: u64,
}

impl EntityLane {
    pub fn new(entity_id: &str, opened: u64) -> EntityLane {
        EntityLane {
            buffer: TrajectoryBuffer::new(entity_id),
            opened,
        }
    }
}
