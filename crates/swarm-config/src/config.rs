use crate::{
    BroadcastConfig, ConfigError, ConfigErrorResult, LoggingConfig, QueueConfig, RegistryConfig,
    ServerConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub broadcast: BroadcastConfig,
    pub queue: QueueConfig,
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for SWARM_CONFIG_DIR env var, else use ./.swarm/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply SWARM_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        // Auto-create config directory
        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: SWARM_CONFIG_DIR env var > ./.swarm/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("SWARM_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".swarm"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.broadcast.validate()?;
        self.queue.validate()?;
        self.registry.validate()?;

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!("  broadcast: {} partitions", self.broadcast.partition_count);
        info!(
            "  queue: fanout={}, delivery={}x{}, cleanup={}",
            self.queue.fanout_queue,
            self.queue.delivery_queue_prefix,
            self.queue.delivery_queue_count,
            self.queue.cleanup_queue
        );
        info!("  registry: page_size={}", self.registry.page_size);
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("SWARM_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("SWARM_SERVER_PORT", &mut self.server.port);

        // Broadcast
        Self::apply_env_parse(
            "SWARM_PARTITION_COUNT",
            &mut self.broadcast.partition_count,
        );

        // Queue
        Self::apply_env_string("SWARM_FANOUT_QUEUE", &mut self.queue.fanout_queue);
        Self::apply_env_string(
            "SWARM_DELIVERY_QUEUE_PREFIX",
            &mut self.queue.delivery_queue_prefix,
        );
        Self::apply_env_string("SWARM_CLEANUP_QUEUE", &mut self.queue.cleanup_queue);

        // Registry
        Self::apply_env_parse("SWARM_REGISTRY_PAGE_SIZE", &mut self.registry.page_size);

        // Logging
        Self::apply_env_parse("SWARM_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("SWARM_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("SWARM_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
