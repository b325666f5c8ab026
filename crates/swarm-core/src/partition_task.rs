use crate::PartitionId;

use serde::{Deserialize, Serialize};

/// One unit of fan-out work: expand a single partition into delivery batches.
///
/// Exactly one task per partition is emitted per broadcast; it exists only
/// in transit on the fan-out queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionTask {
    pub partition: PartitionId,
    pub payload: String,
}

impl PartitionTask {
    pub fn new(partition: PartitionId, payload: impl Into<String>) -> Self {
        Self {
            partition,
            payload: payload.into(),
        }
    }
}
