use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use tokio::io::{AsyncRead, ReadBuf};
use tokio::time::{Instant, Sleep};

// Roughly 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Read adapter that fails reads with `TimedOut` once its deadline passes.
///
/// The deadline is absolute: it is not pushed back by successful reads, only
/// by calling [`Deadline::arm`].
pub struct Deadline<R> {
    inner: R,
    sleep: Pin<Box<Sleep>>,
}

impl<R> Deadline<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self {
            inner,
            sleep: Box::pin(tokio::time::sleep(timeout)),
        }
    }

    /// Sets the deadline to `timeout` from now.
    ///
    /// A timeout too large to represent is clamped to a far-future instant.
    pub fn arm(&mut self, timeout: Duration) {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .unwrap_or_else(|| now + FAR_FUTURE);
        self.sleep.as_mut().reset(deadline);
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for Deadline<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if let Poll::Ready(res) = Pin::new(&mut this.inner).poll_read(cx, buf) {
            return Poll::Ready(res);
        }

        match this.sleep.as_mut().poll(cx) {
            Poll::Ready(()) => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "read deadline exceeded",
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}
