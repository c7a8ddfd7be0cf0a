//! Cooperative cancellation for in-flight transfers.
//! A cloneable flag checked at each buffer-sized chunk boundary; cancellation
//! mid-transfer leaves the destination partially written (callers needing
//! atomicity should write to a temporary path and rename on success).
//!
//! Relaxed atomics are sufficient for a one-way "stop" flag, and `cancel()`
//! is safe to call from signal handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag for asynchronous copy/write/move operations.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation (idempotent).
    #[inline]
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
