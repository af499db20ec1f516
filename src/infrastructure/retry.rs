// Retry policy with exponential backoff for outbound requests
use crate::application::air_quality_client::FetchError;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

const MAX_BACKOFF: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Seconds; the n-th retry waits backoff_factor * 2^(n-1)
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

fn default_retries() -> u32 {
    5
}

fn default_backoff_factor() -> f64 {
    0.2
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl RetryPolicy {
    pub fn new(retries: u32, backoff_factor: f64) -> Self {
        Self {
            retries,
            backoff_factor,
        }
    }

    /// Delay before retry number `attempt + 1`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        if !seconds.is_finite() {
            return MAX_BACKOFF;
        }
        Duration::from_secs_f64(seconds).min(MAX_BACKOFF)
    }

    /// Run `operation`, retrying retryable failures until the budget runs out
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!(retries = attempt, "Request succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    let delay = self.delay_for_attempt(attempt);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
