use async_trait::async_trait;
use swarm_core::ConnectionId;
use thiserror::Error;

/// Failure modes of a single-connection push.
///
/// `Gone` is the only status treated as "connection dead"; anything else is
/// ambiguous (possibly transient) and leaves the connection untouched.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("connection {connection_id} is gone")]
    Gone { connection_id: ConnectionId },

    #[error("post to connection {connection_id} failed: {message}")]
    Send {
        connection_id: ConnectionId,
        message: String,
    },
}

/// Push bytes to one live connection.
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    async fn post(
        &self,
        connection_id: &ConnectionId,
        payload: &[u8],
    ) -> std::result::Result<(), TransportError>;
}
