//! Single-value completion handles
//!
//! [`CompletionHandle::make_async`] spawns one tokio task per call on the
//! runtime of the calling thread. The task owns the sending half and always
//! sends exactly one [`RestResult`], whether or not the handle is still alive.
//! Registry failures are folded into a failure [`Status`] before they reach
//! the channel.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::status::{RestResult, Status, StatusDetails, StatusReason};
use crate::error::{self, ApiError, RegistryResult};

/// Receiving side of an asynchronous storage operation
///
/// Await it to get the outcome. If the task producing the value was aborted
/// before sending, the handle resolves to a failure status instead of
/// hanging, so it always yields exactly one value.
#[derive(Debug)]
pub struct CompletionHandle<T> {
    rx: oneshot::Receiver<RestResult<T>>,
}

impl<T: Send + 'static> CompletionHandle<T> {
    /// Run `work` on its own task and return the handle to its outcome.
    ///
    /// `details` identifies the target object on failure statuses. Fails
    /// with [`ApiError::NoRuntime`] when called outside a tokio runtime;
    /// `work` is dropped without running in that case.
    pub fn make_async<F>(details: StatusDetails, work: F) -> error::Result<Self>
    where
        F: Future<Output = RegistryResult<RestResult<T>>> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|err| ApiError::NoRuntime(err.to_string()))?;
        let (tx, rx) = oneshot::channel();

        runtime.spawn(async move {
            let result = match work.await {
                Ok(result) => result,
                Err(err) => {
                    warn!("{} {:?} failed: {}", details.kind, details.name, err);
                    RestResult::Status(Status::from_registry_error(&err).with_details(details))
                }
            };

            if tx.send(result).is_err() {
                debug!("completion dropped: nobody is waiting on the handle");
            }
        });

        Ok(Self { rx })
    }

    /// Wait at most `timeout`. On expiry the handle is handed back so the
    /// caller can keep waiting or drop it.
    pub async fn wait_for(mut self, timeout: Duration) -> Result<RestResult<T>, Self> {
        match tokio::time::timeout(timeout, &mut self).await {
            Ok(result) => Ok(result),
            Err(_) => Err(self),
        }
    }

    /// Wait at most `timeout`, answering with a `Working` status if the
    /// operation has not finished. The operation keeps running either way.
    pub async fn wait_or_working(self, timeout: Duration) -> RestResult<T> {
        match self.wait_for(timeout).await {
            Ok(result) => result,
            Err(_pending) => RestResult::Status(Status::working()),
        }
    }
}

impl<T> Future for CompletionHandle<T> {
    type Output = RestResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(RestResult::Status(Status::failure(
                StatusReason::Unknown,
                "operation aborted before completing",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
