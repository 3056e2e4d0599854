//! Retry handler for transport calls that may fail temporarily

use std::future::Future;
use tokio::time::{sleep, Duration};

use crate::utils::logging;

/// Handles bounded retry with exponential backoff for remote calls
#[derive(Debug, Clone)]
pub struct RetryHandler {
    max_retries: u32,
    base_delay_ms: u64,
}

impl RetryHandler {
    pub fn new() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }

    pub fn with_config(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// Execute an operation, retrying on failure up to the configured limit
    pub async fn execute_with_retry<F, Fut, T, E>(
        &self,
        operation: F,
        operation_name: &str,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let mut retry_count = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if retry_count > 0 {
                        logging::log_info(&format!(
                            "{} succeeded after {} retries",
                            operation_name, retry_count
                        ));
                    }
                    return Ok(result);
                }
                Err(e) => {
                    retry_count += 1;

                    if retry_count >= self.max_retries {
                        return Err(e);
                    }

                    let delay = self.calculate_delay(retry_count);
                    logging::log_warning(&format!(
                        "{} failed (attempt {}/{}): {}. Retrying in {}ms",
                        operation_name, retry_count, self.max_retries, e, delay
                    ));

                    sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }

    /// Calculate exponential backoff delay
    fn calculate_delay(&self, retry_count: u32) -> u64 {
        self.base_delay_ms * (2_u64.pow(retry_count.saturating_sub(1)))
    }
}

impl Default for RetryHandler {
    fn default() -> Self {
        Self::new()
    }
}
