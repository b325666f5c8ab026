use crate::{DeliveryTransport, InMemoryRegistry, TransportError};

use async_trait::async_trait;
use bytes::Bytes;
use swarm_core::ConnectionId;

/// Loopback transport that pushes payloads into a registered connection's
/// channel. An unknown connection or a closed channel is reported as gone,
/// which is how a dropped socket surfaces to the delivery stage.
pub struct ChannelTransport {
    registry: InMemoryRegistry,
}

impl ChannelTransport {
    pub fn new(registry: InMemoryRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl DeliveryTransport for ChannelTransport {
    async fn post(
        &self,
        connection_id: &ConnectionId,
        payload: &[u8],
    ) -> std::result::Result<(), TransportError> {
        let Some(sender) = self.registry.sender_for(connection_id).await else {
            return Err(TransportError::Gone {
                connection_id: connection_id.clone(),
            });
        };

        sender
            .send(Bytes::copy_from_slice(payload))
            .await
            .map_err(|_| TransportError::Gone {
                connection_id: connection_id.clone(),
            })
    }
}
