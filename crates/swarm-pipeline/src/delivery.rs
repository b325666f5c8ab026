use crate::{DeliveryOutcome, DeliveryTransport, Metrics, QueueClient, QueueEntry, TransportError};

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, warn};
use swarm_config::QueueConfig;
use swarm_core::{
    ConnectionId, DeliveryBatch, DeliveryEntry, Envelope, MAX_BATCH_ENTRIES,
    StaleConnectionNotice, TraceContext, chunk_by,
};

/// Per-connection result of one delivery attempt.
enum Attempt {
    Delivered,
    Stale(ConnectionId),
    Failed,
}

/// Final stage: pushes the payload to every connection in a batch and
/// funnels confirmed-dead connections into the cleanup queue.
pub struct Delivery {
    transport: Arc<dyn DeliveryTransport>,
    queue: Arc<dyn QueueClient>,
    cleanup_queue: String,
    metrics: Metrics,
}

impl Delivery {
    pub fn new(
        transport: Arc<dyn DeliveryTransport>,
        queue: Arc<dyn QueueClient>,
        queues: &QueueConfig,
    ) -> Self {
        Self {
            transport,
            queue,
            cleanup_queue: queues.cleanup_queue.clone(),
            metrics: Metrics::new(),
        }
    }

    /// Attempt every entry of the batch independently and concurrently.
    ///
    /// A gone connection is an expected terminal state, not an error; any
    /// other push failure is ambiguous and leaves the connection eligible
    /// for the next broadcast. Redelivering the same batch is safe.
    pub async fn handle(&self, envelope: Envelope<DeliveryBatch>) -> DeliveryOutcome {
        let batch = envelope.payload;
        let trace = resume_trace(&envelope.trace_header);

        let attempts = batch.entries.iter().map(|entry| self.attempt(entry));
        let results = join_all(attempts).await;

        let mut delivered = 0;
        let mut failed = 0;
        let mut stale = Vec::new();
        for result in results {
            match result {
                Attempt::Delivered => delivered += 1,
                Attempt::Stale(connection_id) => stale.push(connection_id),
                Attempt::Failed => failed += 1,
            }
        }

        self.metrics.deliveries(delivered, stale.len(), failed);

        let (cleanup_batches_sent, cleanup_batches_failed) = if stale.is_empty() {
            (0, 0)
        } else {
            self.send_stale_notices(stale.clone(), &trace).await
        };

        DeliveryOutcome {
            delivered,
            stale: stale.len(),
            failed,
            cleanup_batches_sent,
            cleanup_batches_failed,
        }
    }

    async fn attempt(&self, entry: &DeliveryEntry) -> Attempt {
        match self
            .transport
            .post(&entry.connection_id, entry.payload.as_bytes())
            .await
        {
            Ok(()) => Attempt::Delivered,
            Err(TransportError::Gone { .. }) => {
                // Expected terminal state: the connection dropped since
                // registration. Route it to cleanup.
                debug!("Connection {} is gone", entry.connection_id);
                Attempt::Stale(entry.connection_id.clone())
            }
            Err(e) => {
                warn!("Delivery to {} failed: {e}", entry.connection_id);
                Attempt::Failed
            }
        }
    }

    /// Enqueue confirmed-dead connections for deregistration, trace-linked
    /// to the broadcast that discovered them.
    async fn send_stale_notices(
        &self,
        stale: Vec<ConnectionId>,
        trace: &TraceContext,
    ) -> (usize, usize) {
        let cleanup_trace = trace.child();

        let mut entries = Vec::new();
        let mut failed = 0;
        for chunk in chunk_by(&stale, MAX_BATCH_ENTRIES) {
            match Envelope::new(StaleConnectionNotice::new(chunk), &cleanup_trace).to_json() {
                Ok(body) => entries.push(QueueEntry::new(body)),
                Err(e) => {
                    error!("Failed to encode stale notice: {e}");
                    failed += 1;
                }
            }
        }

        let mut sent = 0;
        for batch in chunk_by(&entries, MAX_BATCH_ENTRIES) {
            let count = batch.len();
            match self
                .queue
                .send_batch(&self.cleanup_queue, batch, &cleanup_trace.header())
                .await
            {
                Ok(report) if report.failed == 0 => sent += 1,
                Ok(_) | Err(_) => {
                    warn!(
                        "Stale notice send to {} failed ({count} notices)",
                        self.cleanup_queue
                    );
                    self.metrics.cleanup_batch_failed();
                    failed += 1;
                }
            }
        }

        if sent > 0 {
            self.metrics.cleanup_notices_sent(stale.len());
        }

        (sent, failed)
    }
}

/// Resume the broadcast trace carried on the queue message, or mint a fresh
/// root when the header is unreadable so the stage stays traceable.
fn resume_trace(header: &str) -> TraceContext {
    match TraceContext::parse(header) {
        Ok(trace) => trace,
        Err(e) => {
            warn!("Unreadable trace header, starting new trace: {e}");
            TraceContext::new_root()
        }
    }
}
