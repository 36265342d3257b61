mod backend_config;
mod cache_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod retry_config;
mod sync_config;

pub use backend_config::BackendConfig;
pub use cache_config::CacheConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use retry_config::RetryConfig;
pub use sync_config::SyncConfig;

#[cfg(test)]
mod tests;

const CONFIG_DIR_ENV: &str = "CARTI_CONFIG_DIR";
const APP_DIR_NAME: &str = "carti";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_PROJECT_ID: &str = "carti-app";
const DEFAULT_AUTH_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";
const DEFAULT_FIRESTORE_URL: &str = "https://firestore.googleapis.com/v1";

const DEFAULT_CACHE_DIR: &str = "cache";
const DEFAULT_PROFILE_KEY: &str = "@carti_user_data";
const DEFAULT_SESSION_KEY: &str = "@carti_session";

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_LOG_COLORED: bool = true;
