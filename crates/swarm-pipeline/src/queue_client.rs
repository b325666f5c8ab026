use crate::Result;

use async_trait::async_trait;
use uuid::Uuid;

/// One message to enqueue.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub id: Uuid,
    pub body: String,
}

impl QueueEntry {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            body: body.into(),
        }
    }
}

/// Per-entry result of one batch send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSendReport {
    pub sent: usize,
    pub failed: usize,
}

impl BatchSendReport {
    pub fn all_sent(count: usize) -> Self {
        Self {
            sent: count,
            failed: 0,
        }
    }
}

/// Queue endpoint used between every pipeline hop.
///
/// Implementations must accept up to `MAX_BATCH_ENTRIES` entries per call
/// and stamp each message with the supplied trace header so downstream
/// consumers can join the broadcast trace.
#[async_trait]
pub trait QueueClient: Send + Sync {
    async fn send_batch(
        &self,
        queue: &str,
        entries: Vec<QueueEntry>,
        trace_header: &str,
    ) -> Result<BatchSendReport>;
}
