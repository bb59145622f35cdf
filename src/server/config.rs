//! Environment configuration.
//!
//! Every setting has a default matching the behaviour of the public deployment, so the service
//! starts with an empty environment. Only malformed values are rejected.

use std::{str::FromStr, time::Duration};

use crate::server::{error::config::ConfigError, service::retry::Backoff};

/// Base URL of the public Rick and Morty API
pub const DEFAULT_UPSTREAM_URL: &str = "https://rickandmortyapi.com/api";
/// Local Valkey instance, database 0
pub const DEFAULT_VALKEY_URL: &str = "redis://127.0.0.1:6379/0";
/// Listen on every interface, port 8000
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Output format of the tracing subscriber, selected with `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human readable output (`compact`, the default)
    Compact,
    /// One JSON object per event (`json`)
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Upstream API base URL without a trailing slash (`UPSTREAM_URL`)
    pub upstream_url: String,
    /// Per-request upstream timeout (`UPSTREAM_TIMEOUT_SECONDS`)
    pub upstream_timeout: Duration,
    /// Attempts per upstream URL, at least 1 (`UPSTREAM_MAX_ATTEMPTS`)
    pub upstream_max_attempts: u32,
    /// Base delay between upstream attempts (`UPSTREAM_RETRY_DELAY_MS`)
    pub upstream_retry_delay: Duration,
    /// How the retry delay grows between attempts (`UPSTREAM_RETRY_BACKOFF`)
    pub upstream_retry_backoff: Backoff,
    /// User-Agent header sent upstream (`USER_AGENT`)
    pub user_agent: String,
    /// Redis/Valkey connection URL (`VALKEY_URL`)
    pub valkey_url: String,
    /// Audit database; the audit store stays unavailable when unset
    pub database_url: Option<String>,
    /// Lifetime of the cached character list (`CACHE_TTL_SECONDS`)
    pub cache_ttl: Duration,
    /// Upper bound on a single cache or audit operation (`STORE_TIMEOUT_MS`)
    pub store_timeout: Duration,
    /// Token bucket capacity (requests)
    pub rate_limit: u32,
    /// Period over which `rate_limit` tokens are refilled
    pub rate_limit_per: Duration,
    /// Socket address the HTTP server binds (`BIND_ADDRESS`)
    pub bind_address: String,
    /// Log output format (`LOG_FORMAT`)
    pub log_format: LogFormat,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let upstream_url = lookup("UPSTREAM_URL")
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let upstream_max_attempts: u32 = parse_var(&lookup, "UPSTREAM_MAX_ATTEMPTS", 10)?;
        if upstream_max_attempts == 0 {
            return Err(invalid("UPSTREAM_MAX_ATTEMPTS", "must be at least 1"));
        }

        let rate_limit: u32 = parse_var(&lookup, "RATE_LIMIT", 5)?;
        if rate_limit == 0 {
            return Err(invalid("RATE_LIMIT", "must be at least 1"));
        }

        let rate_limit_per_secs: u64 = parse_var(&lookup, "RATE_LIMIT_PER_SECONDS", 60)?;
        if rate_limit_per_secs == 0 {
            return Err(invalid("RATE_LIMIT_PER_SECONDS", "must be at least 1"));
        }

        let store_timeout_ms: u64 = parse_var(&lookup, "STORE_TIMEOUT_MS", 1000)?;
        if store_timeout_ms == 0 {
            return Err(invalid("STORE_TIMEOUT_MS", "must be at least 1"));
        }

        let upstream_retry_backoff = match lookup("UPSTREAM_RETRY_BACKOFF").as_deref() {
            None | Some("fixed") => Backoff::Fixed,
            Some("exponential") => Backoff::Exponential,
            Some(other) => {
                return Err(invalid(
                    "UPSTREAM_RETRY_BACKOFF",
                    &format!("expected `fixed` or `exponential`, got `{}`", other),
                ))
            }
        };

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("compact") => LogFormat::Compact,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(invalid(
                    "LOG_FORMAT",
                    &format!("expected `compact` or `json`, got `{}`", other),
                ))
            }
        };

        Ok(Self {
            upstream_url,
            upstream_timeout: Duration::from_secs(parse_var(
                &lookup,
                "UPSTREAM_TIMEOUT_SECONDS",
                10,
            )?),
            upstream_max_attempts,
            upstream_retry_delay: Duration::from_millis(parse_var(
                &lookup,
                "UPSTREAM_RETRY_DELAY_MS",
                1000,
            )?),
            upstream_retry_backoff,
            user_agent: lookup("USER_AGENT")
                .unwrap_or_else(|| format!("earthlings/{}", env!("CARGO_PKG_VERSION"))),
            valkey_url: lookup("VALKEY_URL").unwrap_or_else(|| DEFAULT_VALKEY_URL.to_string()),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            cache_ttl: Duration::from_secs(parse_var(&lookup, "CACHE_TTL_SECONDS", 10)?),
            store_timeout: Duration::from_millis(store_timeout_ms),
            rate_limit,
            rate_limit_per: Duration::from_secs(rate_limit_per_secs),
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            log_format,
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| invalid(var, &e.to_string())),
    }
}

fn invalid(var: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidEnvValue {
        var: var.to_string(),
        reason: reason.to_string(),
    }
}
