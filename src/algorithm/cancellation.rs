//! Cooperative cancellation shared between a caller and a running build

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag checked between tiles and between grid cells
///
/// Clones share the same flag, so a caller can keep one clone and hand
/// another to the assembler running on a worker thread.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every build holding a clone of this token
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
