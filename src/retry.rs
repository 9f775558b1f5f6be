//! Bounded retry with fixed backoff for transient adapter failures.

use crate::config::RetryConfig;
use std::fmt::Display;
use std::future::Future;
use tracing::{debug, warn};

/// Run `operation` up to `config.max_attempts` times, sleeping the fixed
/// backoff between attempts. `should_retry` decides whether a given error is
/// worth another attempt; a non-retryable error is returned immediately.
pub async fn with_retry<T, E, F, Fut, P>(
    config: &RetryConfig,
    should_retry: P,
    operation: F,
) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let attempts = config.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        if attempt > 1 {
            debug!(attempt, backoff_ms = config.backoff.as_millis() as u64, "retrying");
            tokio::time::sleep(config.backoff).await;
        }

        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if !should_retry(&err) {
                    return Err(err);
                }
                warn!(attempt, max_attempts = attempts, error = %err, "attempt failed");
                last_error = Some(err);
            }
        }
    }

    // attempts >= 1, so at least one error was recorded before we get here
    Err(last_error.unwrap())
}
