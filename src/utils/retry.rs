use backoff::{Error as BackoffError, ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;
use tracing::warn;

use crate::error::SourceError;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// No retries at all; the first failure is returned.
    pub fn none() -> Self {
        Self::new(0)
    }

    pub fn to_exponential_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_interval(self.max_interval)
            .with_multiplier(self.multiplier)
            .with_max_elapsed_time(Some(Duration::from_secs(30)))
            .build()
    }

    /// Retry an async source call with exponential backoff.
    ///
    /// `NotFound` is permanent and returned immediately. Other failures are
    /// retried until `max_retries` retries have been spent.
    pub async fn retry_async<F, Fut, T>(&self, mut operation: F) -> Result<T, SourceError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, SourceError>>,
    {
        let backoff = self.to_exponential_backoff();
        let max_retries = self.max_retries;
        let mut attempt = 0u32;

        let retry_operation = || {
            attempt += 1;
            let current = attempt;
            let call = operation();
            async move {
                match call.await {
                    Ok(result) => Ok(result),
                    Err(e @ SourceError::NotFound(_)) => Err(BackoffError::permanent(e)),
                    Err(e) if current > max_retries => Err(BackoffError::permanent(e)),
                    Err(e) => {
                        warn!("Operation failed (attempt {}/{}), will retry: {}", current, max_retries + 1, e);
                        Err(BackoffError::transient(e))
                    }
                }
            }
        };

        backoff::future::retry(backoff, retry_operation).await
    }
}
