use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{ScanError, ScanResult};

/// Cooperative cancellation token shared between the scan and whoever
/// requests the abort (typically a signal handler).
///
/// Cancellation is polled, not preemptive: the engine calls
/// [`checkpoint`] before each revision and before each report line, and
/// aborts with [`ScanError::Cancelled`] once the token is set. Cloning is
/// cheap; all clones observe the same flag.
///
/// [`checkpoint`]: CancelToken::checkpoint
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from any thread, any number of
    /// times; the token never resets.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fail with [`ScanError::Cancelled`] if cancellation was requested.
    pub fn checkpoint(&self) -> ScanResult<()> {
        if self.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }
}
