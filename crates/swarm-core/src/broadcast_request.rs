use chrono::{DateTime, Utc};

/// A request to broadcast one message to every live connection.
///
/// Created by an external caller, consumed once by the trigger component.
#[derive(Debug, Clone)]
pub struct BroadcastRequest {
    pub payload: String,
    pub requested_at: DateTime<Utc>,
}

impl BroadcastRequest {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            requested_at: Utc::now(),
        }
    }

    /// The wire payload: the caller's message stamped with the request time,
    /// so receivers can tell broadcasts apart.
    pub fn stamped_payload(&self) -> String {
        format!("{}#{}", self.payload, self.requested_at.to_rfc3339())
    }
}
