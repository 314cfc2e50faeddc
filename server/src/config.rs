//! Process configuration read from the environment at startup.

use std::time::Duration;

const DEFAULT_ACQUIRE_TIMEOUT_MS: u64 = 30_000;

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    /// Upper bound on pooled connections. Requests beyond it wait in the
    /// pool's queue rather than being rejected.
    pub pool_size: u32,
    /// How long a queued request waits for a connection before failing.
    pub acquire_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://items.db?mode=rwc".to_string(),
            pool_size: 10,
            acquire_timeout: Duration::from_millis(DEFAULT_ACQUIRE_TIMEOUT_MS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bind_addr: String,
    pub log_json: bool,
    pub database: DatabaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            log_json: false,
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or unparsable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("BIND_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = env_parse(&lookup, "PORT", 3000_u16);
        let acquire_ms = env_parse(&lookup, "DB_ACQUIRE_TIMEOUT_MS", DEFAULT_ACQUIRE_TIMEOUT_MS);

        Self {
            bind_addr: format!("{host}:{port}"),
            log_json: env_bool(&lookup, "LOG_JSON", defaults.log_json),
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.database.url),
                pool_size: env_parse(&lookup, "DB_POOL_SIZE", defaults.database.pool_size).max(1),
                acquire_timeout: Duration::from_millis(acquire_ms),
            },
        }
    }
}

fn env_bool<F>(lookup: &F, name: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_parse<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
