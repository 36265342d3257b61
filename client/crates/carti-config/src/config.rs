use crate::{
    APP_DIR_NAME, BackendConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, CacheConfig, ConfigError,
    ConfigErrorResult, LoggingConfig, RetryConfig, SyncConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub cache: CacheConfig,
    pub sync: SyncConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. `CARTI_CONFIG_DIR` env var, else the platform config dir + `carti/`
    /// 2. Auto-create the config directory if it doesn't exist
    /// 3. Load `config.toml` if it exists, else use defaults
    /// 4. Apply `CARTI_*` environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: CARTI_CONFIG_DIR env var > <platform config dir>/carti
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Validate all sections. Call after load() to fail at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.backend.validate()?;
        self.cache.validate()?;
        self.sync.validate()?;
        self.retry.validate()?;

        if let Some(ref file) = self.logging.file
            && (file.is_empty() || file.contains('/') || file.contains('\\'))
        {
            return Err(ConfigError::logging(format!(
                "logging.file must be a plain file name, got '{file}'"
            )));
        }

        Ok(())
    }

    /// Absolute path of the key-value cache directory.
    pub fn cache_dir(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.cache.dir))
    }

    /// Absolute path of the log file, when file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        match self.logging.file {
            Some(ref file) => Ok(Some(
                Self::config_dir()?.join(&self.logging.dir).join(file),
            )),
            None => Ok(None),
        }
    }

    /// Log configuration summary (NEVER logs the API key).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  backend: project={} api_key={}",
            self.backend.project_id,
            if self.backend.has_api_key() {
                "set"
            } else {
                "missing"
            }
        );
        info!(
            "  endpoints: auth={} token={} firestore={}",
            self.backend.auth_url, self.backend.token_url, self.backend.firestore_url
        );
        info!(
            "  cache: dir={} profile_key={} session_key={}",
            self.cache.dir, self.cache.profile_key, self.cache.session_key
        );
        info!("  sync: fetch_timeout={}ms", self.sync.fetch_timeout_ms);
        info!(
            "  retry: attempts={}, initial={}ms, max={}ms, backoff={}x, jitter={}",
            self.retry.max_attempts,
            self.retry.initial_delay_ms,
            self.retry.max_delay_ms,
            self.retry.backoff_multiplier,
            self.retry.jitter
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Backend
        Self::apply_env_option_string("CARTI_API_KEY", &mut self.backend.api_key);
        Self::apply_env_string("CARTI_PROJECT_ID", &mut self.backend.project_id);
        Self::apply_env_string("CARTI_AUTH_URL", &mut self.backend.auth_url);
        Self::apply_env_string("CARTI_TOKEN_URL", &mut self.backend.token_url);
        Self::apply_env_string("CARTI_FIRESTORE_URL", &mut self.backend.firestore_url);

        // Cache
        Self::apply_env_string("CARTI_CACHE_DIR", &mut self.cache.dir);
        Self::apply_env_string("CARTI_CACHE_PROFILE_KEY", &mut self.cache.profile_key);
        Self::apply_env_string("CARTI_CACHE_SESSION_KEY", &mut self.cache.session_key);

        // Sync
        Self::apply_env_parse("CARTI_FETCH_TIMEOUT_MS", &mut self.sync.fetch_timeout_ms);

        // Retry
        Self::apply_env_parse("CARTI_RETRY_MAX_ATTEMPTS", &mut self.retry.max_attempts);
        Self::apply_env_parse(
            "CARTI_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_parse("CARTI_RETRY_MAX_DELAY_MS", &mut self.retry.max_delay_ms);
        Self::apply_env_parse(
            "CARTI_RETRY_BACKOFF_MULTIPLIER",
            &mut self.retry.backoff_multiplier,
        );
        Self::apply_env_bool("CARTI_RETRY_JITTER", &mut self.retry.jitter);

        // Logging
        Self::apply_env_parse("CARTI_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("CARTI_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("CARTI_LOG_FILE", &mut self.logging.file);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values are ignored and the previous value kept.
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
