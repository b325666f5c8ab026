use crate::{BatchSendReport, PipelineError, QueueClient, QueueEntry, Result};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{RwLock, mpsc};

/// One message in transit on an in-memory queue.
#[derive(Debug, Clone)]
pub struct QueueMessage {
    pub body: String,
    pub trace_header: String,
}

/// Named in-process queues backed by unbounded channels.
///
/// Queues must be declared before anything sends to them; declaring hands
/// back the consuming end.
pub struct InMemoryQueueBus {
    inner: Arc<RwLock<HashMap<String, mpsc::UnboundedSender<QueueMessage>>>>,
}

impl InMemoryQueueBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create the named queue and return its receiver.
    /// Redeclaring a queue replaces the previous receiver.
    pub async fn declare(&self, queue: &str) -> mpsc::UnboundedReceiver<QueueMessage> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.write().await;
        if inner.insert(queue.to_string(), sender).is_some() {
            log::warn!("Queue {queue} redeclared, previous receiver detached");
        }
        receiver
    }
}

impl Default for InMemoryQueueBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryQueueBus {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl QueueClient for InMemoryQueueBus {
    async fn send_batch(
        &self,
        queue: &str,
        entries: Vec<QueueEntry>,
        trace_header: &str,
    ) -> Result<BatchSendReport> {
        let inner = self.inner.read().await;
        let Some(sender) = inner.get(queue) else {
            return Err(PipelineError::queue_send(
                queue.to_string(),
                "queue not declared".to_string(),
            ));
        };

        let mut sent = 0;
        let mut failed = 0;
        for entry in entries {
            let message = QueueMessage {
                body: entry.body,
                trace_header: trace_header.to_string(),
            };
            if sender.send(message).is_ok() {
                sent += 1;
            } else {
                failed += 1;
            }
        }

        Ok(BatchSendReport { sent, failed })
    }
}
