use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use swarm_core::PartitionId;
use swarm_pipeline::{InMemoryRegistry, Trigger};

/// Shared application state for the HTTP and WebSocket handlers
#[derive(Clone)]
pub struct AppState {
    pub trigger: Arc<Trigger>,
    pub registry: InMemoryRegistry,
    pub partition_count: u32,
    pub next_partition: Arc<AtomicU32>,
}

impl AppState {
    /// Round-robin partition assignment for new connections.
    pub fn next_partition_id(&self) -> PartitionId {
        let n = self.next_partition.fetch_add(1, Ordering::Relaxed);
        PartitionId::new(n % self.partition_count)
    }
}
