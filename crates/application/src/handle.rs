//! Caller-visible handle for an in-flight request

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::runtime::Handle;
use tokio::task::{JoinError, JoinHandle};

use crate::cancellation::CancellationToken;
use crate::ports::TransportError;
use crate::result_ext::ResponseResult;

/// A request running on its own task.
///
/// Awaiting the handle yields the request's single terminal outcome.
/// Dropping it cancels the request unless [`RequestHandle::detach`] was
/// called first.
#[derive(Debug)]
#[must_use = "dropping a RequestHandle cancels the request"]
pub struct RequestHandle<O> {
    task: JoinHandle<ResponseResult<O>>,
    token: CancellationToken,
    detached: bool,
}

impl<O> RequestHandle<O> {
    pub(crate) fn new(task: JoinHandle<ResponseResult<O>>, token: CancellationToken) -> Self {
        Self {
            task,
            token,
            detached: false,
        }
    }

    /// Cancels the request. Safe to call any number of times.
    ///
    /// Once cancelled, awaiting the handle yields a cancellation error even
    /// if the exchange finished in the meantime.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns a token that cancels this request from elsewhere.
    #[must_use]
    pub fn canceller(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Returns true if the request was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns true once the request task has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Lets the request run to completion without anyone awaiting it.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl<O: Send + 'static> RequestHandle<O> {
    /// Delivers the outcome to `callback` on the given runtime.
    ///
    /// Only the completion callback runs there; the exchange itself stays on
    /// its own task.
    pub fn deliver_on<F>(self, runtime: &Handle, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(ResponseResult<O>) + Send + 'static,
    {
        runtime.spawn(async move {
            let outcome = self.await;
            callback(outcome);
        })
    }
}

fn join_failure(err: &JoinError) -> TransportError {
    if err.is_cancelled() {
        TransportError::Cancelled
    } else {
        TransportError::Other(format!("request task failed: {err}"))
    }
}

impl<O> Future for RequestHandle<O> {
    type Output = ResponseResult<O>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let joined = match Pin::new(&mut this.task).poll(cx) {
            Poll::Ready(joined) => joined,
            Poll::Pending => return Poll::Pending,
        };

        let outcome = match joined {
            Ok(outcome) => outcome,
            Err(err) => Err(join_failure(&err).into()),
        };

        if outcome.is_ok() && this.token.is_cancelled() {
            return Poll::Ready(Err(TransportError::Cancelled.into()));
        }
        Poll::Ready(outcome)
    }
}

impl<O> Drop for RequestHandle<O> {
    fn drop(&mut self) {
        if !self.detached {
            self.token.cancel();
        }
    }
}
