use crate::ConnectionId;

use serde::{Deserialize, Serialize};

/// Connections the delivery transport confirmed gone.
///
/// Terminal artifact of the delivery stage; consumed by the external
/// cleanup collaborator, which deregisters the connections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaleConnectionNotice {
    pub connection_ids: Vec<ConnectionId>,
}

impl StaleConnectionNotice {
    pub fn new(connection_ids: Vec<ConnectionId>) -> Self {
        Self { connection_ids }
    }
}
