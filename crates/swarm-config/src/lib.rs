mod broadcast_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod queue_config;
mod registry_config;
mod server_config;

pub use broadcast_config::BroadcastConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use queue_config::QueueConfig;
pub use registry_config::RegistryConfig;
pub use server_config::ServerConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
