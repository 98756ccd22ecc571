//! Cancellation of in-flight I/O.
//!
//! Store and database calls run under a caller-supplied [`CancellationToken`]. When the
//! token fires first, the pending future is dropped and [`Cancelled`] is returned.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// The operation was aborted because its cancellation token fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Drive `fut` to completion unless `token` is cancelled first.
pub async fn cancellable<F>(token: &CancellationToken, fut: F) -> Result<F::Output, Cancelled>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Cancelled),
        output = fut => Ok(output),
    }
}
