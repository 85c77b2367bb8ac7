//! Caching, retry, queuing, batching and call metrics

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::ApiClient;
use crate::cancel::CancelHandle;
use crate::error::Result;
use crate::metrics::PerformanceMetrics;

/// How often and how patiently to retry a failing call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included
    pub max_retries: u32,
    /// Pause before the second attempt; doubled after every further failure
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Run `producer` until it succeeds or the policy is exhausted
///
/// Delays grow as `delay, 2×delay, 4×delay, …`. The last failure is returned
/// unchanged. A 401 is returned at once: the session is gone by then and
/// repeating the call cannot help. A policy of zero attempts still runs the
/// producer once.
pub async fn retry_with_backoff<T, F, Fut>(mut producer: F, policy: RetryPolicy) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.max_retries.max(1);
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match producer().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_unauthorized() || attempt >= attempts => return Err(e),
            Err(e) => {
                debug!(
                    "Request failed ({}), retrying in {:?}... ({}/{})",
                    e.message(),
                    delay,
                    attempt,
                    attempts
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
        }
    }
}

/// Run every producer concurrently and collect the results in input order
///
/// Fails as soon as any member fails; the other results are discarded.
pub async fn batch<T, I, F, Fut>(producers: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    futures::future::try_join_all(producers.into_iter().map(|producer| producer())).await
}

impl ApiClient {
    // =============================================================================
    // Cache
    // =============================================================================

    /// Return the cached value for `key`, or fetch, cache and return it
    ///
    /// See [`crate::cache::DEFAULT_TTL`] for the usual time-to-live.
    pub async fn get_cached<T, F, Fut>(&self, key: &str, producer: F, ttl: Duration) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.state.cache.get_or_fetch(key, producer, ttl).await
    }

    /// Drop one cache entry, or every entry when `key` is `None`
    pub fn clear_cache(&self, key: Option<&str>) {
        match key {
            Some(key) => self.state.cache.invalidate(key),
            None => self.state.cache.clear(),
        }
    }

    // =============================================================================
    // Retry, Queue, Batch
    // =============================================================================

    /// Retry `producer` with exponential backoff
    pub async fn retry_request<T, F, Fut>(&self, producer: F, policy: RetryPolicy) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        retry_with_backoff(producer, policy).await
    }

    /// Run `producer` through the serial queue
    pub async fn queue_request<T, F, Fut>(&self, producer: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        self.state.queue.enqueue(producer).await
    }

    /// Run producers concurrently, failing fast
    pub async fn batch_requests<T, I, F, Fut>(&self, producers: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        batch(producers).await
    }

    /// A handle able to cancel one call wrapped with [`CancelHandle::run`]
    pub fn create_cancel_handle(&self) -> CancelHandle {
        CancelHandle::new()
    }

    // =============================================================================
    // Performance Metrics
    // =============================================================================

    pub fn get_performance_metrics(&self) -> PerformanceMetrics {
        self.state.metrics.snapshot()
    }

    pub fn reset_performance_metrics(&self) {
        self.state.metrics.reset();
    }
}
