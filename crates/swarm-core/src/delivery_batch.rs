use crate::{ConnectionId, CoreError, Result};

use serde::{Deserialize, Serialize};

/// Hard maximum entries per queue send and per delivery batch.
/// Matches the delivery transport's entries-per-batch limit.
pub const MAX_BATCH_ENTRIES: usize = 10;

/// One delivery attempt: push `payload` to `connection_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEntry {
    pub connection_id: ConnectionId,
    pub payload: String,
}

impl DeliveryEntry {
    pub fn new(connection_id: ConnectionId, payload: impl Into<String>) -> Self {
        Self {
            connection_id,
            payload: payload.into(),
        }
    }
}

/// A bounded group of delivery entries, in transit on a delivery queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryBatch {
    pub entries: Vec<DeliveryEntry>,
}

impl DeliveryBatch {
    /// Build a batch, rejecting anything over the transport limit.
    pub fn new(entries: Vec<DeliveryEntry>) -> Result<Self> {
        if entries.len() > MAX_BATCH_ENTRIES {
            return Err(CoreError::validation(
                format!(
                    "delivery batch holds {} entries, maximum is {}",
                    entries.len(),
                    MAX_BATCH_ENTRIES
                ),
                Some("entries"),
            ));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
