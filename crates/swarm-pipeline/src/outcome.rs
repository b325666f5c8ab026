use serde::Serialize;
use swarm_core::PartitionId;

/// What one broadcast trigger actually enqueued.
///
/// The pipeline is best-effort by design; failures are absorbed into logs
/// and these counts rather than raised to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerOutcome {
    pub partitions: u32,
    pub batches_sent: usize,
    pub batches_failed: usize,
}

/// What one partition's fan-out produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FanOutOutcome {
    pub partition: PartitionId,
    pub connections: usize,
    pub bucket: usize,
    pub batches_sent: usize,
    pub batches_failed: usize,
}

/// Per-connection tally of one delivery batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub delivered: usize,
    pub stale: usize,
    pub failed: usize,
    pub cleanup_batches_sent: usize,
    pub cleanup_batches_failed: usize,
}
