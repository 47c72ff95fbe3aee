//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. It provides
//! thread-safe access and mutation for testing or overrides in runtime environments.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};
use std::time::Duration;

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub host: String,
    pub port: u16,
    pub cpu_stat_path: String,
    pub stream_interval_ms: u64,
    /// Fallbacks taken while loading, kept until logging is up.
    pub warnings: Vec<String>,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CPU_STAT_PATH: &str = "/proc/stat";
pub const DEFAULT_STREAM_INTERVAL_MS: u64 = 1000;

/// Reads `key` and parses it, falling back to `default` when the variable is
/// missing or does not parse. Parse failures are recorded in `warnings`.
fn parse_var<T: FromStr + Display>(key: &str, default: T, warnings: &mut Vec<String>) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!("Invalid {key}={raw:?}, using default {default}"));
            default
        }),
        Err(_) => default,
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// This method is used internally to populate the singleton. Missing or
    /// malformed values fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut warnings = Vec::new();
        let port = parse_var("PORT", DEFAULT_PORT, &mut warnings);
        let stream_interval_ms =
            match parse_var("STREAM_INTERVAL_MS", DEFAULT_STREAM_INTERVAL_MS, &mut warnings) {
                0 => {
                    warnings.push(format!(
                        "STREAM_INTERVAL_MS=0 is not a period, using default {DEFAULT_STREAM_INTERVAL_MS}"
                    ));
                    DEFAULT_STREAM_INTERVAL_MS
                }
                ms => ms,
            };

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "cpu-stream".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info,util=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            cpu_stat_path: env::var("CPU_STAT_PATH")
                .unwrap_or_else(|_| DEFAULT_CPU_STAT_PATH.into()),
            stream_interval_ms,
            warnings,
        }
    }

    /// Logs every fallback taken by [`AppConfig::from_env`].
    ///
    /// The config is loaded before the subscriber exists, so callers invoke
    /// this once logging is initialized.
    pub fn report_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!(target: "util::config", "{warning}");
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    /// Tick period for every stream session.
    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }

    /// Generic internal setter for any field in the config.
    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_cpu_stat_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.cpu_stat_path = value.into());
    }

    pub fn set_stream_interval_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.stream_interval_ms = value);
    }
}
