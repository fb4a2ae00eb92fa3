use crate::database::{RetryPolicy, DEFAULT_DATABASE_URL};
use std::env;
use std::time::Duration;

const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5000;
const DEFAULT_CONNECT_ATTEMPTS: u32 = 5;
const DEFAULT_CONNECT_BACKOFF_MS: u64 = 500;

/// Runtime settings for the search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub database_url: String,
    pub query_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
            retry: RetryPolicy {
                max_attempts: DEFAULT_CONNECT_ATTEMPTS,
                backoff: Duration::from_millis(DEFAULT_CONNECT_BACKOFF_MS),
            },
        }
    }
}

impl SearchConfig {
    /// Reads settings from the process environment. Unset or unparsable
    /// values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let max_attempts = u32::try_from(number(
            "DB_CONNECT_ATTEMPTS",
            DEFAULT_CONNECT_ATTEMPTS as u64,
        ))
        .unwrap_or(DEFAULT_CONNECT_ATTEMPTS);

        Self {
            database_url,
            query_timeout: Duration::from_millis(number(
                "QUERY_TIMEOUT_MS",
                DEFAULT_QUERY_TIMEOUT_MS,
            )),
            retry: RetryPolicy {
                max_attempts,
                backoff: Duration::from_millis(number(
                    "DB_CONNECT_BACKOFF_MS",
                    DEFAULT_CONNECT_BACKOFF_MS,
                )),
            },
        }
    }
}
