// Runtime configuration with defaults suitable for an interactive caller.

use std::time::Duration;

/// Retry behavior for transient network failures inside adapters.
///
/// Retries use a fixed backoff delay and are invisible to the aggregator,
/// which only sees the adapter's final outcome within its own timeout budget.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Top-level configuration for the search service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Wall-clock budget for one category's aggregation. Any adapter not
    /// settled by then is treated as failed-by-timeout.
    pub category_timeout: Duration,
    /// Outer budget for a whole search call. Looser than `category_timeout`
    /// so a runaway category cannot block the rest of the response.
    pub search_timeout: Duration,
    /// How long a cached result set stays valid.
    pub cache_ttl: Duration,
    /// Per-request timeout for plain HTTP adapters.
    pub http_timeout: Duration,
    pub retry: RetryConfig,
    /// Base seed for the flight-offer generator; combined with the route so
    /// identical queries always produce identical offers.
    pub flight_seed: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            category_timeout: Duration::from_secs(120),
            search_timeout: Duration::from_secs(150),
            cache_ttl: Duration::from_secs(3600),
            http_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            flight_seed: 0,
        }
    }
}

impl AppConfig {
    /// Build a config from environment variables, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            category_timeout: env_secs("TS_CATEGORY_TIMEOUT_SECS", defaults.category_timeout),
            search_timeout: env_secs("TS_SEARCH_TIMEOUT_SECS", defaults.search_timeout),
            cache_ttl: env_secs("TS_CACHE_TTL_SECS", defaults.cache_ttl),
            http_timeout: env_secs("TS_HTTP_TIMEOUT_SECS", defaults.http_timeout),
            retry: RetryConfig {
                max_attempts: env_parse("TS_RETRY_ATTEMPTS", defaults.retry.max_attempts),
                backoff: env_millis("TS_RETRY_BACKOFF_MS", defaults.retry.backoff),
            },
            flight_seed: env_parse("TS_FLIGHT_SEED", defaults.flight_seed),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_secs(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn env_millis(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .map(Duration::from_millis)
        .unwrap_or(default)
}
