use crate::{ConfigError, ConfigErrorResult, DEFAULT_HOST, DEFAULT_PORT};

use serde::Deserialize;

pub const MIN_PORT: u16 = 1024;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from(DEFAULT_HOST),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        // Port 0 means "auto-assign" - OS picks an available port.
        // Any other port must be >= MIN_PORT (1024).
        if self.port != 0 && self.port < MIN_PORT {
            return Err(ConfigError::config(format!(
                "server.port must be 0 (auto) or >= {}, got {}",
                MIN_PORT, self.port
            )));
        }

        Ok(())
    }
}
