use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

// Page size constraints
pub const MIN_PAGE_SIZE: usize = 1;
pub const MAX_PAGE_SIZE: usize = 1_000;
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Connection registry query settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum items returned per registry query page
    pub page_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.page_size < MIN_PAGE_SIZE || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::config(format!(
                "registry.page_size must be {}-{}, got {}",
                MIN_PAGE_SIZE, MAX_PAGE_SIZE, self.page_size
            )));
        }

        Ok(())
    }
}
