//! Cooperative cancellation

use std::sync::Arc;

use tokio::sync::watch;

/// Caller-side half of a cancellation pair. Clones share the same state.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

/// Task-side half: resolves once the token is cancelled.
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    /// Creates a linked token/receiver pair.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, CancellationReceiver) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                sender: Arc::new(sender),
            },
            CancellationReceiver { receiver },
        )
    }

    /// Signals cancellation. Repeated calls are no-ops.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Returns true once [`CancellationToken::cancel`] was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Returns another receiver for this token.
    #[must_use]
    pub fn receiver(&self) -> CancellationReceiver {
        CancellationReceiver {
            receiver: self.sender.subscribe(),
        }
    }
}

impl CancellationReceiver {
    /// Waits until cancellation is signalled.
    ///
    /// If every token is dropped without cancelling, this never resolves.
    pub async fn cancelled(&mut self) {
        let closed = self.receiver.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }

    /// Returns true if cancellation was signalled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_wakes_receiver() {
        let (token, mut receiver) = CancellationToken::new();

        let waiter = tokio::spawn(async move { receiver.cancelled().await });
        token.cancel();

        assert!(tokio::time::timeout(Duration::from_secs(1), waiter).await.is_ok());
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_is_idempotent() {
        let (token, receiver) = CancellationToken::new();
        token.cancel();
        token.cancel();
        assert!(receiver.is_cancelled());
    }

    #[tokio::test]
    async fn test_already_cancelled_resolves_immediately() {
        let (token, _receiver) = CancellationToken::new();
        token.cancel();

        let mut late = token.receiver();
        assert!(
            tokio::time::timeout(Duration::from_millis(100), late.cancelled())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_dropped_token_never_resolves() {
        let (token, mut receiver) = CancellationToken::new();
        drop(token);

        let result = tokio::time::timeout(Duration::from_millis(50), receiver.cancelled()).await;
        assert!(result.is_err());
    }
}
