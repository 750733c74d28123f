//! Cancellation and deadline context for a collection run.

use super::BundleError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation flag plus optional deadline.
///
/// Clones share the cancellation flag, so a clone handed to another thread
/// can stop a running collection.
#[derive(Debug, Clone, Default)]
pub struct CollectContext {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CollectContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Request cancellation. Visible to every clone.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fail if the run was cancelled or its deadline has passed.
    pub fn check(&self) -> Result<(), BundleError> {
        if self.is_cancelled() {
            return Err(BundleError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(BundleError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}
