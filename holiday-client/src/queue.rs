//! Serial request queue
//!
//! Requests handed to the queue run one at a time, strictly in the order they
//! were enqueued. After each request settles the drain task waits a fixed
//! spacing before starting the next one. At most one drain task exists: an
//! enqueue that finds the queue already draining only appends.

use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::error::{ClientError, Result};

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

struct QueueInner {
    pending: Mutex<VecDeque<Job>>,
    draining: AtomicBool,
    spacing: Duration,
}

/// FIFO queue with a single consumer task
#[derive(Clone)]
pub struct RequestQueue {
    inner: Arc<QueueInner>,
}

impl RequestQueue {
    /// Creates a queue pausing `spacing` after every settled request
    pub fn new(spacing: Duration) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                pending: Mutex::new(VecDeque::new()),
                draining: AtomicBool::new(false),
                spacing,
            }),
        }
    }

    /// Pause inserted after each settled request
    pub fn spacing(&self) -> Duration {
        self.inner.spacing
    }

    /// Number of requests waiting to start
    pub fn len(&self) -> usize {
        self.inner.pending.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a drain task is currently running
    pub fn is_draining(&self) -> bool {
        self.inner.draining.load(Ordering::SeqCst)
    }

    /// Appends a request and waits for its result
    ///
    /// `producer` is not invoked until every request enqueued before it has
    /// settled and the spacing has elapsed. The request keeps its place even
    /// if the returned future is dropped.
    pub async fn enqueue<T, F, Fut>(&self, producer: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::pin(async move {
            let outcome = producer().await;
            let _ = tx.send(outcome);
        });

        self.inner.pending.lock().unwrap().push_back(job);
        self.start_draining();

        rx.await
            .map_err(|_| ClientError::Internal("queued request was dropped".to_string()))?
    }

    /// Drops every request that has not started yet
    ///
    /// Their callers observe an internal error.
    pub fn clear(&self) {
        self.inner.pending.lock().unwrap().clear();
    }

    fn start_draining(&self) {
        if self.inner.draining.swap(true, Ordering::SeqCst) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            drain(inner).await;
        });
    }
}

async fn drain(inner: Arc<QueueInner>) {
    debug!("Request queue drain started");

    loop {
        let next = inner.pending.lock().unwrap().pop_front();

        match next {
            Some(job) => {
                // A panicking producer drops its sender; its caller sees an
                // internal error and the queue moves on.
                if AssertUnwindSafe(job).catch_unwind().await.is_err() {
                    error!("Queued request panicked");
                }
                tokio::time::sleep(inner.spacing).await;
            }
            None => {
                inner.draining.store(false, Ordering::SeqCst);

                // An enqueue may have slipped in between the pop and the store.
                let refilled = !inner.pending.lock().unwrap().is_empty();
                if refilled && !inner.draining.swap(true, Ordering::SeqCst) {
                    continue;
                }
                break;
            }
        }
    }

    debug!("Request queue drained");
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueue")
            .field("pending", &self.len())
            .field("draining", &self.is_draining())
            .field("spacing", &self.inner.spacing)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_requests_start_in_order_with_spacing() {
        let queue = RequestQueue::new(Duration::from_millis(100));
        let log: Arc<Mutex<Vec<(usize, Instant, Instant)>>> = Arc::new(Mutex::new(Vec::new()));

        let make = |i: usize, work: u64| {
            let log = Arc::clone(&log);
            move || async move {
                let started = Instant::now();
                tokio::time::sleep(Duration::from_millis(work)).await;
                log.lock().unwrap().push((i, started, Instant::now()));
                Ok::<_, ClientError>(i)
            }
        };

        let (a, b, c) = tokio::join!(
            queue.enqueue(make(0, 50)),
            queue.enqueue(make(1, 10)),
            queue.enqueue(make(2, 30)),
        );
        assert_eq!((a.unwrap(), b.unwrap(), c.unwrap()), (0, 1, 2));

        let log = log.lock().unwrap();
        let order: Vec<usize> = log.iter().map(|(i, _, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2]);

        for pair in log.windows(2) {
            let (_, _, prev_settled) = pair[0];
            let (_, next_started, _) = pair[1];
            assert!(next_started - prev_settled >= Duration::from_millis(100));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_settle_and_queue_continues() {
        let queue = RequestQueue::new(Duration::from_millis(100));

        let failed: Result<()> = queue
            .enqueue(|| async { Err(ClientError::api_error(429, "slow down")) })
            .await;
        assert_eq!(failed.unwrap_err().status(), 429);

        let ok = queue.enqueue(|| async { Ok::<_, ClientError>("next") }).await;
        assert_eq!(ok.unwrap(), "next");
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_drain_task() {
        let queue = RequestQueue::new(Duration::from_millis(100));
        let q = queue.clone();

        let first = tokio::spawn(async move {
            q.enqueue(|| async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok::<_, ClientError>(1)
            })
            .await
        });
        tokio::task::yield_now().await;
        assert!(queue.is_draining());

        let second = queue.enqueue(|| async { Ok::<_, ClientError>(2) }).await;
        assert_eq!(second.unwrap(), 2);
        assert_eq!(first.await.unwrap().unwrap(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!queue.is_draining());
        assert!(queue.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_request_does_not_stall_queue() {
        let queue = RequestQueue::new(Duration::from_millis(100));

        async fn explode() -> Result<u32> {
            panic!("producer blew up")
        }

        let panicked = queue.enqueue(explode).await;
        assert!(matches!(panicked, Err(ClientError::Internal(_))));

        let next = tokio::time::timeout(
            Duration::from_secs(2),
            queue.enqueue(|| async { Ok::<_, ClientError>(2) }),
        )
        .await
        .expect("queue stalled after a panic");
        assert_eq!(next.unwrap(), 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!queue.is_draining());
    }
}
