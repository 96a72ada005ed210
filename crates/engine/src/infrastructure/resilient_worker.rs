//! Resilient worker client wrapper with exponential backoff retry
//!
//! Wraps any AiWorkerPort implementation with retry logic to handle
//! transient failures (connection resets, 5xx from the worker).

use async_trait::async_trait;
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chronoquest_shared::ImageResponse;

use crate::infrastructure::ports::{
    AiWorkerPort, WorkerChatReply, WorkerChatRequest, WorkerError, WorkerImageRequest,
    WorkerStats,
};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) for randomizing delays
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 500,
            max_delay_ms: 5000,
            jitter_factor: 0.2,
        }
    }
}

/// Wrapper that adds retry logic to any worker client
pub struct ResilientWorkerClient {
    inner: Arc<dyn AiWorkerPort>,
    config: RetryConfig,
}

impl ResilientWorkerClient {
    pub fn new(inner: Arc<dyn AiWorkerPort>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Delay for a given attempt number using exponential backoff with jitter
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        // Exponential: base * 2^(attempt-1)
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    async fn execute_with_retry<T, F, Fut>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, WorkerError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, WorkerError>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(response) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            operation = operation_name,
                            "Worker request succeeded after retry"
                        );
                    }
                    return Ok(response);
                }
                Err(e) => {
                    if !e.is_retryable() {
                        tracing::warn!(
                            error = %e,
                            operation = operation_name,
                            "Worker request failed with non-retryable error"
                        );
                        return Err(e);
                    }

                    if attempt < self.config.max_retries {
                        let delay = self.calculate_delay(attempt + 1);
                        tracing::warn!(
                            attempt = attempt + 1,
                            max_retries = self.config.max_retries,
                            delay_ms = delay,
                            error = %e,
                            operation = operation_name,
                            "Worker request failed, retrying..."
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }

                    last_error = Some(e);
                }
            }
        }

        let error =
            last_error.unwrap_or_else(|| WorkerError::RequestFailed("Unknown error".to_string()));
        tracing::error!(
            attempts = self.config.max_retries + 1,
            error = %error,
            operation = operation_name,
            "Worker request failed after all retry attempts"
        );
        Err(error)
    }
}

#[async_trait]
impl AiWorkerPort for ResilientWorkerClient {
    async fn chat(&self, request: WorkerChatRequest) -> Result<WorkerChatReply, WorkerError> {
        let inner = Arc::clone(&self.inner);
        self.execute_with_retry("chat", || {
            let inner = Arc::clone(&inner);
            let request = request.clone();
            async move { inner.chat(request).await }
        })
        .await
    }

    async fn image(&self, request: WorkerImageRequest) -> Result<ImageResponse, WorkerError> {
        let inner = Arc::clone(&self.inner);
        self.execute_with_retry("image", || {
            let inner = Arc::clone(&inner);
            let request = request.clone();
            async move { inner.image(request).await }
        })
        .await
    }

    async fn stats(&self) -> Result<WorkerStats, WorkerError> {
        // Stats are a health probe; a single attempt says what we need
        self.inner.stats().await
    }
}
