//! Cooperative cancellation.
//!
//! The parser and the inspectors poll `check()` at every production entry
//! and every inference recursion. There are no other suspension points.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::CancellationError;

/// The single-operation cancellation interface.
///
/// `check()` either returns or raises `CancellationError`; implementations
/// must be cheap because the poll sits on the parser's hot path.
pub trait CancellationToken {
    fn check(&self) -> Result<(), CancellationError>;
}

/// A token that never cancels.
#[derive(Copy, Clone, Default, Debug)]
pub struct NeverCancelled;

impl CancellationToken for NeverCancelled {
    #[inline]
    fn check(&self) -> Result<(), CancellationError> {
        Ok(())
    }
}

/// A flag-backed token for callers that cancel from another thread.
#[derive(Default, Debug)]
pub struct CancellationFlag {
    cancelled: AtomicBool,
}

impl CancellationFlag {
    pub fn new() -> Self {
        CancellationFlag::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl CancellationToken for CancellationFlag {
    #[inline]
    fn check(&self) -> Result<(), CancellationError> {
        if self.is_cancelled() {
            Err(CancellationError::default())
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_cancelled_always_passes() {
        assert!(NeverCancelled.check().is_ok());
    }

    #[test]
    fn flag_cancels_after_cancel() {
        let flag = CancellationFlag::new();
        assert!(flag.check().is_ok());
        flag.cancel();
        assert!(flag.check().is_err());
    }
}
