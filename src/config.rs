//! Service configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! `Config::from_env` is called once at startup and the resulting value is
//! handed to the components that need it. Message limits travel inside
//! `AppState`; nothing reads the environment after startup.

use crate::validation::ValidationError;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_POSTGRES_HOST: &str = "localhost";
pub const DEFAULT_POSTGRES_PORT: u16 = 5432;
pub const DEFAULT_POSTGRES_USER: &str = "postgres";
pub const DEFAULT_POSTGRES_PASSWORD: &str = "postgres";
pub const DEFAULT_POSTGRES_DB: &str = "chat_db";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_MESSAGE_LIMIT: i64 = 20;
pub const MAX_MESSAGE_LIMIT: i64 = 100;
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MAX_MESSAGE_LIMIT must be at least 1, got {0}")]
    MaxLimitTooSmall(i64),
    #[error("DEFAULT_MESSAGE_LIMIT {default} must be within 1..={max}")]
    DefaultLimitOutOfRange { default: i64, max: i64 },
}

// =============================================================================
// DATABASE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// Full connection string; overrides the individual parts when set.
    pub url_override: Option<String>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection URL for sqlx.
    #[must_use]
    pub fn url(&self) -> String {
        match &self.url_override {
            Some(url) => url.clone(),
            None => format!(
                "postgres://{}:{}@{}:{}/{}",
                self.user, self.password, self.host, self.port, self.name
            ),
        }
    }
}

// =============================================================================
// MESSAGE LIMITS
// =============================================================================

/// Bounds for the number of messages returned with a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLimits {
    pub default: i64,
    pub max: i64,
}

impl MessageLimits {
    /// # Errors
    ///
    /// Returns an error if `max < 1` or `default` is outside `1..=max`.
    pub fn new(default: i64, max: i64) -> Result<Self, ConfigError> {
        if max < 1 {
            return Err(ConfigError::MaxLimitTooSmall(max));
        }
        if !(1..=max).contains(&default) {
            return Err(ConfigError::DefaultLimitOutOfRange { default, max });
        }
        Ok(Self { default, max })
    }

    /// Resolve a caller-supplied limit. Out-of-range values are rejected,
    /// never clamped.
    ///
    /// # Errors
    ///
    /// Returns a query validation error for `limit` outside `1..=max`.
    pub fn resolve(&self, requested: Option<i64>) -> Result<i64, ValidationError> {
        match requested {
            None => Ok(self.default),
            Some(limit) if limit < 1 => Err(ValidationError::query(
                "limit",
                "greater_than_equal",
                "Input should be greater than or equal to 1".to_string(),
            )),
            Some(limit) if limit > self.max => Err(ValidationError::query(
                "limit",
                "less_than_equal",
                format!("Input should be less than or equal to {}", self.max),
            )),
            Some(limit) => Ok(limit),
        }
    }
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self { default: DEFAULT_MESSAGE_LIMIT, max: MAX_MESSAGE_LIMIT }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
    pub limits: MessageLimits,
    pub log_level: String,
    pub debug: bool,
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 8000
    /// - `DATABASE_URL`: overrides the `POSTGRES_*` parts
    /// - `POSTGRES_HOST`, `POSTGRES_PORT`, `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_DB`
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `DEFAULT_MESSAGE_LIMIT`: default 20
    /// - `MAX_MESSAGE_LIMIT`: default 100
    /// - `LOG_LEVEL`: default `info`
    /// - `DEBUG`: forces the `debug` log level when truthy
    ///
    /// # Errors
    ///
    /// Returns an error if the message limits are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database = DatabaseConfig {
            host: env_string("POSTGRES_HOST", DEFAULT_POSTGRES_HOST),
            port: env_parse("POSTGRES_PORT", DEFAULT_POSTGRES_PORT),
            user: env_string("POSTGRES_USER", DEFAULT_POSTGRES_USER),
            password: env_string("POSTGRES_PASSWORD", DEFAULT_POSTGRES_PASSWORD),
            name: env_string("POSTGRES_DB", DEFAULT_POSTGRES_DB),
            url_override: std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
        };

        let limits = limits_from_env("DEFAULT_MESSAGE_LIMIT", "MAX_MESSAGE_LIMIT")?;

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            database,
            limits,
            log_level: env_string("LOG_LEVEL", DEFAULT_LOG_LEVEL).to_ascii_lowercase(),
            debug: env_bool("DEBUG").unwrap_or(false),
        })
    }

    /// Directive for the tracing `EnvFilter` when `RUST_LOG` is not set.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        if self.debug { "debug" } else { &self.log_level }
    }
}

fn limits_from_env(default_key: &str, max_key: &str) -> Result<MessageLimits, ConfigError> {
    MessageLimits::new(
        env_parse(default_key, DEFAULT_MESSAGE_LIMIT),
        env_parse(max_key, MAX_MESSAGE_LIMIT),
    )
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str) -> Option<bool> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
