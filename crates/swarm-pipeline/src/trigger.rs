use crate::{Metrics, QueueClient, QueueEntry, TriggerOutcome};

use std::sync::Arc;

use futures::future::join_all;
use log::{info, warn};
use swarm_config::{BroadcastConfig, QueueConfig};
use swarm_core::{
    BroadcastRequest, Envelope, MAX_BATCH_ENTRIES, PartitionId, PartitionTask, TraceContext,
    chunk_by,
};

/// Entry point of the pipeline: expands one broadcast request into exactly
/// one partition task per partition and enqueues them toward fan-out.
pub struct Trigger {
    queue: Arc<dyn QueueClient>,
    fanout_queue: String,
    partition_count: u32,
    metrics: Metrics,
}

impl Trigger {
    pub fn new(
        queue: Arc<dyn QueueClient>,
        broadcast: &BroadcastConfig,
        queues: &QueueConfig,
    ) -> Self {
        Self {
            queue,
            fanout_queue: queues.fanout_queue.clone(),
            partition_count: broadcast.partition_count,
            metrics: Metrics::new(),
        }
    }

    /// Fan a broadcast request out to every partition.
    ///
    /// Failed batch sends are recorded against the broadcast trace and the
    /// outcome counts; redelivery is the queue's responsibility, so there is
    /// no internal retry and the call never fails outright.
    pub async fn broadcast(&self, request: BroadcastRequest) -> TriggerOutcome {
        let trace = TraceContext::new_root();
        let payload = request.stamped_payload();

        info!(
            "Broadcast accepted: {} partitions, trace {}",
            self.partition_count,
            trace.root()
        );
        self.metrics.broadcast_triggered();

        let tasks: Vec<PartitionTask> = (0..self.partition_count)
            .map(|id| PartitionTask::new(PartitionId::new(id), payload.clone()))
            .collect();

        let send_trace = trace.child();
        let batches = chunk_by(&tasks, MAX_BATCH_ENTRIES);
        let total_batches = batches.len();

        let sends = batches
            .into_iter()
            .map(|batch| self.send_task_batch(batch, &send_trace));
        let batches_sent = join_all(sends).await.into_iter().filter(|ok| *ok).count();

        self.metrics.partition_tasks_sent(tasks.len());

        TriggerOutcome {
            partitions: self.partition_count,
            batches_sent,
            batches_failed: total_batches - batches_sent,
        }
    }

    /// Send one batch of partition tasks; failures are isolated per batch.
    async fn send_task_batch(&self, tasks: Vec<PartitionTask>, trace: &TraceContext) -> bool {
        let mut entries = Vec::with_capacity(tasks.len());
        for task in tasks {
            match Envelope::new(task, trace).to_json() {
                Ok(body) => entries.push(QueueEntry::new(body)),
                Err(e) => {
                    warn!("Failed to encode partition task: {e}");
                    self.metrics.trigger_batch_failed();
                    return false;
                }
            }
        }

        match self
            .queue
            .send_batch(&self.fanout_queue, entries, &trace.header())
            .await
        {
            Ok(report) if report.failed == 0 => true,
            Ok(report) => {
                warn!(
                    "Partial task batch failure on {}: {} of {} entries failed",
                    self.fanout_queue,
                    report.failed,
                    report.sent + report.failed
                );
                self.metrics.trigger_batch_failed();
                false
            }
            Err(e) => {
                warn!("Task batch send to {} failed: {e}", self.fanout_queue);
                self.metrics.trigger_batch_failed();
                false
            }
        }
    }
}
