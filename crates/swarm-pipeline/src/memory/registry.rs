use crate::{ConnectionPage, ConnectionStore, PipelineError, Result};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use log::{info, warn};
use swarm_core::{ConnectionId, PartitionId};
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Registry entry for one live connection
#[derive(Clone)]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    pub partition: PartitionId,
    pub connected_at: chrono::DateTime<chrono::Utc>,
    pub sender: mpsc::Sender<Bytes>,
}

/// Registry for tracking active connections, sharded by partition.
///
/// Implements the pipeline's read-only `ConnectionStore` with offset-token
/// pagination; registration and deregistration are host-side operations.
pub struct InMemoryRegistry {
    inner: Arc<RwLock<RegistryInner>>,
    page_size: usize,
}

struct RegistryInner {
    /// All active connections by connection_id
    connections: HashMap<ConnectionId, ConnectionInfo>,
    /// Connection ids per partition, in registration order
    partitions: HashMap<PartitionId, Vec<ConnectionId>>,
}

impl InMemoryRegistry {
    pub fn new(page_size: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RegistryInner {
                connections: HashMap::new(),
                partitions: HashMap::new(),
            })),
            page_size,
        }
    }

    /// Register a new connection under the given partition.
    /// The partition assignment is stable for the connection's lifetime.
    pub async fn register(
        &self,
        partition: PartitionId,
        sender: mpsc::Sender<Bytes>,
    ) -> Result<ConnectionId> {
        let connection_id = ConnectionId::parse(&Uuid::new_v4().to_string())
            .map_err(|e| PipelineError::internal(e.to_string()))?;

        let info = ConnectionInfo {
            connection_id: connection_id.clone(),
            partition,
            connected_at: chrono::Utc::now(),
            sender,
        };

        let mut inner = self.inner.write().await;
        inner.connections.insert(connection_id.clone(), info);
        inner
            .partitions
            .entry(partition)
            .or_default()
            .push(connection_id.clone());

        info!(
            "Registered connection {connection_id} in partition {partition} ({} total)",
            inner.connections.len()
        );

        Ok(connection_id)
    }

    /// Unregister a connection; returns whether it was present.
    pub async fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let mut inner = self.inner.write().await;

        let Some(info) = inner.connections.remove(connection_id) else {
            return false;
        };

        if let Some(members) = inner.partitions.get_mut(&info.partition) {
            members.retain(|id| id != connection_id);
        }

        info!(
            "Unregistered connection {connection_id} ({} total remaining)",
            inner.connections.len()
        );
        true
    }

    /// Delivery channel of a connection, if it is still registered
    pub async fn sender_for(&self, connection_id: &ConnectionId) -> Option<mpsc::Sender<Bytes>> {
        let inner = self.inner.read().await;
        inner
            .connections
            .get(connection_id)
            .map(|info| info.sender.clone())
    }

    /// Get total connection count
    pub async fn total_count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.connections.len()
    }
}

impl Clone for InMemoryRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            page_size: self.page_size,
        }
    }
}

#[async_trait]
impl ConnectionStore for InMemoryRegistry {
    async fn query_partition(
        &self,
        partition: PartitionId,
        continuation: Option<&str>,
    ) -> Result<ConnectionPage> {
        let offset = match continuation {
            None => 0,
            Some(token) => token.parse::<usize>().map_err(|_| {
                warn!("Bad continuation token for partition {partition}: {token}");
                PipelineError::registry_query(
                    partition,
                    format!("invalid continuation token: {token}"),
                )
            })?,
        };

        let inner = self.inner.read().await;
        let members = inner
            .partitions
            .get(&partition)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let end = (offset + self.page_size).min(members.len());
        let items = members[offset.min(members.len())..end].to_vec();
        let next_token = (end < members.len()).then(|| end.to_string());

        Ok(ConnectionPage { items, next_token })
    }
}
