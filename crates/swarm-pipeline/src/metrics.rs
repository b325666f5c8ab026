use metrics::{counter, histogram};

/// Metrics collector for pipeline stages
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "swarm" }
    }

    /// Record a broadcast trigger accepted
    pub fn broadcast_triggered(&self) {
        counter!(format!("{}.broadcasts.triggered", self.prefix)).increment(1);
    }

    /// Record partition tasks enqueued toward fan-out
    pub fn partition_tasks_sent(&self, count: usize) {
        counter!(format!("{}.trigger.tasks_sent", self.prefix)).increment(count as u64);
    }

    /// Record a failed trigger task batch
    pub fn trigger_batch_failed(&self) {
        counter!(format!("{}.trigger.batches_failed", self.prefix)).increment(1);
    }

    /// Record a partition's loaded connection count
    pub fn partition_loaded(&self, connections: usize) {
        counter!(format!("{}.fanout.partitions_loaded", self.prefix)).increment(1);
        histogram!(format!("{}.fanout.partition_size", self.prefix)).record(connections as f64);
    }

    /// Record a registry query failure
    pub fn registry_query_failed(&self) {
        counter!(format!("{}.fanout.registry_errors", self.prefix)).increment(1);
    }

    /// Record a delivery batch routed to a bucket
    pub fn fanout_batch_sent(&self, bucket: usize) {
        counter!(format!("{}.fanout.batches_sent", self.prefix)).increment(1);
        counter!(format!("{}.fanout.bucket.{}", self.prefix, bucket)).increment(1);
    }

    /// Record a failed delivery batch send
    pub fn fanout_batch_failed(&self) {
        counter!(format!("{}.fanout.batches_failed", self.prefix)).increment(1);
    }

    /// Record delivery attempts by classification
    pub fn deliveries(&self, delivered: usize, stale: usize, failed: usize) {
        counter!(format!("{}.delivery.delivered", self.prefix)).increment(delivered as u64);
        counter!(format!("{}.delivery.stale", self.prefix)).increment(stale as u64);
        counter!(format!("{}.delivery.failed", self.prefix)).increment(failed as u64);
    }

    /// Record stale connection notices enqueued for cleanup
    pub fn cleanup_notices_sent(&self, count: usize) {
        counter!(format!("{}.cleanup.notices_sent", self.prefix)).increment(count as u64);
    }

    /// Record a failed cleanup batch send
    pub fn cleanup_batch_failed(&self) {
        counter!(format!("{}.cleanup.batches_failed", self.prefix)).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
