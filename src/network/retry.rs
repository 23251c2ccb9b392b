//! Retry logic with exponential backoff

use std::time::Duration;
use anyhow::Result;
use tracing::warn;
use crate::errors::{EngineError, EngineResult};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub exponential_base: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: crate::config::MAX_FETCH_ATTEMPTS,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            exponential_base: 2.0,
        }
    }
}

pub async fn retry_with_backoff<F, Fut, T>(
    operation: F,
    config: &RetryConfig,
    context: &str,
) -> EngineResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay_ms;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempt >= config.max_attempts => {
                return Err(EngineError::SourceUnavailable {
                    source_name: context.to_string(),
                    message: format!("failed after {} attempts", attempt),
                    source: Some(e),
                    retry_count: attempt,
                });
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{} failed for {}: {}. Retrying in {}ms...",
                    attempt, config.max_attempts, context, e, delay
                );

                tokio::time::sleep(Duration::from_millis(delay)).await;

                delay = (delay as f64 * config.exponential_base) as u64;
                delay = delay.min(config.max_delay_ms);
                let jitter = (delay as f64 * 0.1 * (rand::random::<f64>() - 0.5)) as u64;
                delay = delay.saturating_add(jitter);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 1,
            max_delay_ms: 2,
            exponential_base: 2.0,
        }
    }

    #[tokio::test]
    async fn succeeds_without_exhausting_attempts() {
        let calls = AtomicU32::new(0);
        let result = retry_with_backoff(
            || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 1 {
                    Err(anyhow::anyhow!("transient"))
                } else {
                    Ok(7u32)
                }
            },
            &fast_config(),
            "test op",
        )
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn exhaustion_reports_attempt_count() {
        let result: EngineResult<u32> = retry_with_backoff(
            || async { Err(anyhow::anyhow!("down")) },
            &fast_config(),
            "test op",
        )
        .await;

        match result.unwrap_err() {
            EngineError::SourceUnavailable { retry_count, .. } => assert_eq!(retry_count, 3),
            other => panic!("unexpected error: {}", other),
        }
    }
}
