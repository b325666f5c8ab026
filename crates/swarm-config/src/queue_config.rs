use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const DEFAULT_FANOUT_QUEUE: &str = "swarm-fanout";
pub const DEFAULT_DELIVERY_QUEUE_PREFIX: &str = "swarm-delivery-";
pub const DEFAULT_CLEANUP_QUEUE: &str = "swarm-cleanup";

/// Default load thresholds for delivery queue bucketing, ascending.
pub fn default_load_thresholds() -> Vec<u32> {
    vec![250, 500, 750, 1000, 1250, 1500, 1750, 2000, 2250, 2500]
}

/// Queue endpoint naming and delivery bucketing.
///
/// Delivery queues are addressed as `<delivery_queue_prefix><bucket>` where
/// the bucket is chosen by the fan-out stage's load bucketing function.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub fanout_queue: String,
    pub delivery_queue_prefix: String,
    pub delivery_queue_count: usize,
    pub cleanup_queue: String,
    /// Ascending load thresholds; one delivery queue per threshold
    pub load_thresholds: Vec<u32>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        let load_thresholds = default_load_thresholds();
        Self {
            fanout_queue: String::from(DEFAULT_FANOUT_QUEUE),
            delivery_queue_prefix: String::from(DEFAULT_DELIVERY_QUEUE_PREFIX),
            delivery_queue_count: load_thresholds.len(),
            cleanup_queue: String::from(DEFAULT_CLEANUP_QUEUE),
            load_thresholds,
        }
    }
}

impl QueueConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.fanout_queue.is_empty()
            || self.cleanup_queue.is_empty()
            || self.delivery_queue_prefix.is_empty()
        {
            return Err(ConfigError::queue("queue names cannot be empty"));
        }

        if self.load_thresholds.is_empty() {
            return Err(ConfigError::queue("queue.load_thresholds cannot be empty"));
        }

        if !self.load_thresholds.is_sorted_by(|a, b| a < b) {
            return Err(ConfigError::queue(format!(
                "queue.load_thresholds must be strictly ascending, got {:?}",
                self.load_thresholds
            )));
        }

        // One delivery queue endpoint per bucket
        if self.delivery_queue_count != self.load_thresholds.len() {
            return Err(ConfigError::queue(format!(
                "queue.delivery_queue_count ({}) must match load_thresholds length ({})",
                self.delivery_queue_count,
                self.load_thresholds.len()
            )));
        }

        Ok(())
    }

    /// Endpoint name of the delivery queue for a bucket index.
    pub fn delivery_queue(&self, bucket: usize) -> String {
        format!("{}{}", self.delivery_queue_prefix, bucket)
    }
}
