use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Partition count constraints
pub const MIN_PARTITION_COUNT: u32 = 1;
pub const MAX_PARTITION_COUNT: u32 = 10_000;
pub const DEFAULT_PARTITION_COUNT: u32 = 8;

/// Broadcast sharding settings.
///
/// The partition count is a static sharding of the connection keyspace;
/// changing it redistributes only connections registered afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BroadcastConfig {
    /// Number of logical partitions the connection keyspace is sharded into
    pub partition_count: u32,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            partition_count: DEFAULT_PARTITION_COUNT,
        }
    }
}

impl BroadcastConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.partition_count < MIN_PARTITION_COUNT
            || self.partition_count > MAX_PARTITION_COUNT
        {
            return Err(ConfigError::config(format!(
                "broadcast.partition_count must be {}-{}, got {}",
                MIN_PARTITION_COUNT, MAX_PARTITION_COUNT, self.partition_count
            )));
        }

        Ok(())
    }
}
