//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use marketplace_core::{DispatchConfig, MarketConfig, Retention};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Marketplace service settings.
    pub market: MarketConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `API_ADDR` | Server bind address | `127.0.0.1:8787` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:velan.db?mode=rwc` |
    /// | `DISPATCH_CONCURRENCY` | Parallel notification writes | `16` |
    /// | `DISPATCH_WRITE_TIMEOUT_MS` | Per-recipient write timeout | `2000` |
    /// | `LISTING_RETENTION` | `infinite` or a number of days | `infinite` |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("API_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            lookup("SQLITE_PATH").unwrap_or_else(|| "sqlite:velan.db?mode=rwc".to_string());

        let concurrency = match lookup("DISPATCH_CONCURRENCY") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidNumber("DISPATCH_CONCURRENCY")),
            },
            None => DispatchConfig::DEFAULT_CONCURRENCY,
        };

        let write_timeout = match lookup("DISPATCH_WRITE_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => return Err(ConfigError::InvalidNumber("DISPATCH_WRITE_TIMEOUT_MS")),
            },
            None => DispatchConfig::DEFAULT_WRITE_TIMEOUT,
        };

        let retention = match lookup("LISTING_RETENTION") {
            Some(raw) => Retention::parse(&raw).ok_or(ConfigError::InvalidRetention(raw))?,
            None => Retention::Infinite,
        };

        Ok(Self {
            addr,
            database_url,
            market: MarketConfig {
                dispatch: DispatchConfig {
                    concurrency,
                    write_timeout,
                },
                retention,
            },
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API_ADDR format")]
    InvalidAddr,

    #[error("{0} must be a positive integer")]
    InvalidNumber(&'static str),

    #[error("Invalid LISTING_RETENTION '{0}': expected 'infinite' or a number of days")]
    InvalidRetention(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.addr.to_string(), "127.0.0.1:8787");
        assert_eq!(config.database_url, "sqlite:velan.db?mode=rwc");
        assert_eq!(config.market.dispatch, DispatchConfig::default());
        assert_eq!(config.market.retention, Retention::Infinite);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("API_ADDR", "0.0.0.0:9000"),
            ("DISPATCH_CONCURRENCY", "4"),
            ("DISPATCH_WRITE_TIMEOUT_MS", "250"),
            ("LISTING_RETENTION", "30"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.market.dispatch.concurrency, 4);
        assert_eq!(config.market.dispatch.write_timeout, Duration::from_millis(250));
        assert_eq!(Some(config.market.retention), Retention::parse("30d"));
        assert_ne!(config.market.retention, Retention::Infinite);
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(load(&[("API_ADDR", "nope")]), Err(ConfigError::InvalidAddr)));
        assert!(matches!(
            load(&[("DISPATCH_CONCURRENCY", "0")]),
            Err(ConfigError::InvalidNumber("DISPATCH_CONCURRENCY"))
        ));
        assert!(matches!(
            load(&[("LISTING_RETENTION", "forever")]),
            Err(ConfigError::InvalidRetention(_))
        ));
    }
}
