use crate::{ConnectionStore, FanOutOutcome, Metrics, QueueClient, QueueEntry};

use std::sync::Arc;

use futures::future::join_all;
use log::{debug, error, warn};
use swarm_config::QueueConfig;
use swarm_core::{
    ConnectionId, DeliveryBatch, DeliveryEntry, Envelope, MAX_BATCH_ENTRIES, PartitionId,
    PartitionTask, TraceContext, bucket_for_load, chunk_by,
};

/// Middle stage: expands one partition task into bounded delivery batches,
/// routed to a delivery queue chosen by the partition's load.
pub struct FanOut {
    store: Arc<dyn ConnectionStore>,
    queue: Arc<dyn QueueClient>,
    queues: QueueConfig,
    metrics: Metrics,
}

impl FanOut {
    pub fn new(
        store: Arc<dyn ConnectionStore>,
        queue: Arc<dyn QueueClient>,
        queues: QueueConfig,
    ) -> Self {
        Self {
            store,
            queue,
            queues,
            metrics: Metrics::new(),
        }
    }

    /// Expand one partition into delivery batches.
    ///
    /// A registry failure degrades the partition to zero recipients; one
    /// chunk's send failure never blocks or fails its sibling chunks. Either
    /// way the invocation completes and reports what happened.
    pub async fn handle(&self, envelope: Envelope<PartitionTask>) -> FanOutOutcome {
        let task = envelope.payload;
        let trace = resume_trace(&envelope.trace_header);

        let connections = self.load_connections(task.partition).await;
        self.metrics.partition_loaded(connections.len());

        if connections.is_empty() {
            debug!("Partition {} has no connections", task.partition);
            return FanOutOutcome {
                partition: task.partition,
                connections: 0,
                bucket: 0,
                batches_sent: 0,
                batches_failed: 0,
            };
        }

        let bucket = bucket_for_load(connections.len() as u32, &self.queues.load_thresholds);
        let delivery_queue = self.queues.delivery_queue(bucket);
        debug!(
            "Partition {}: {} connections -> bucket {} ({})",
            task.partition,
            connections.len(),
            bucket,
            delivery_queue
        );

        let send_trace = trace.child();
        let chunks = chunk_by(&connections, MAX_BATCH_ENTRIES);
        let total_batches = chunks.len();

        let sends = chunks
            .into_iter()
            .map(|chunk| self.send_chunk(chunk, &task, &delivery_queue, bucket, &send_trace));
        let batches_sent = join_all(sends).await.into_iter().filter(|ok| *ok).count();

        FanOutOutcome {
            partition: task.partition,
            connections: connections.len(),
            bucket,
            batches_sent,
            batches_failed: total_batches - batches_sent,
        }
    }

    /// Load every connection id in the partition, following continuation
    /// tokens until the registry reports no more pages.
    async fn load_connections(&self, partition: PartitionId) -> Vec<ConnectionId> {
        let mut connections = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            match self
                .store
                .query_partition(partition, continuation.as_deref())
                .await
            {
                Ok(page) => {
                    connections.extend(page.items);
                    match page.next_token {
                        Some(token) => continuation = Some(token),
                        None => break,
                    }
                }
                Err(e) => {
                    // Partition-scoped failure: this partition degrades to
                    // zero recipients, the broadcast carries on without it.
                    error!("Registry query failed for partition {partition}: {e}");
                    self.metrics.registry_query_failed();
                    return Vec::new();
                }
            }
        }

        connections
    }

    /// Build and send one delivery batch; failures are isolated per chunk.
    async fn send_chunk(
        &self,
        chunk: Vec<ConnectionId>,
        task: &PartitionTask,
        delivery_queue: &str,
        bucket: usize,
        trace: &TraceContext,
    ) -> bool {
        let entries = chunk
            .into_iter()
            .map(|connection_id| DeliveryEntry::new(connection_id, task.payload.clone()))
            .collect();

        let batch = match DeliveryBatch::new(entries) {
            Ok(batch) => batch,
            Err(e) => {
                error!("Partition {}: {e}", task.partition);
                self.metrics.fanout_batch_failed();
                return false;
            }
        };

        let body = match Envelope::new(batch, trace).to_json() {
            Ok(body) => body,
            Err(e) => {
                error!(
                    "Partition {}: failed to encode delivery batch: {e}",
                    task.partition
                );
                self.metrics.fanout_batch_failed();
                return false;
            }
        };

        match self
            .queue
            .send_batch(delivery_queue, vec![QueueEntry::new(body)], &trace.header())
            .await
        {
            Ok(report) if report.failed == 0 => {
                self.metrics.fanout_batch_sent(bucket);
                true
            }
            Ok(_) | Err(_) => {
                warn!(
                    "Partition {}: delivery batch send to {delivery_queue} failed",
                    task.partition
                );
                self.metrics.fanout_batch_failed();
                false
            }
        }
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
