//! Cancellation handles for individual calls

use tokio::sync::watch;

use crate::error::{ClientError, Result};

/// Lets one in-flight call be abandoned from elsewhere
///
/// Clones share the same signal. Once cancelled a handle stays cancelled.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Signals cancellation to the guarded call
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Runs `call`, resolving to `ClientError::Cancelled` if cancelled first
    pub async fn run<T, Fut>(&self, call: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let mut rx = self.tx.subscribe();

        tokio::select! {
            result = call => result,
            _ = rx.wait_for(|cancelled| *cancelled) => Err(ClientError::Cancelled),
        }
    }
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_call() {
        let handle = CancelHandle::new();
        let trigger = handle.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result: Result<()> = handle
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
        assert!(handle.is_cancelled());
    }

    #[tokio::test]
    async fn test_completed_call_is_returned() {
        let handle = CancelHandle::new();
        let result = handle.run(async { Ok::<_, ClientError>(5) }).await;
        assert_eq!(result.unwrap(), 5);
    }
}
