use crate::Result;

use async_trait::async_trait;
use swarm_core::{ConnectionId, PartitionId};

/// One page of a partition's connection listing.
#[derive(Debug, Clone)]
pub struct ConnectionPage {
    pub items: Vec<ConnectionId>,
    /// Present when more pages remain
    pub next_token: Option<String>,
}

/// Read side of the connection registry.
///
/// Results may be paginated; callers must loop until `next_token` is absent.
/// The pipeline never writes through this interface - stale connections are
/// deregistered by the external cleanup collaborator.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    async fn query_partition(
        &self,
        partition: PartitionId,
        continuation: Option<&str>,
    ) -> Result<ConnectionPage>;
}
