use crate::{CoreError, Result};

use serde::{Deserialize, Serialize};

/// Opaque identifier for one live connection.
///
/// Minted and owned by the connection registry; the pipeline only ever
/// reads it and routes on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn parse(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(CoreError::validation(
                "connection_id cannot be empty",
                Some("connection_id"),
            ));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
