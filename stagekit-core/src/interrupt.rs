//! Shared interrupt flag set from a signal handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Cloneable handle to a process-wide "stop requested" flag.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Returns `Error::Interrupted` once the flag has been set.
    pub fn check(&self) -> Result<()> {
        if self.is_triggered() {
            Err(Error::Interrupted)
        } else {
            Ok(())
        }
    }

    /// Reports a tool failure as `Error::Interrupted` once the flag is set.
    /// Ctrl+C reaches child processes too.
    pub fn classify<T>(&self, result: Result<T>) -> Result<T> {
        match result {
            Err(Error::ToolFailed { .. }) if self.is_triggered() => Err(Error::Interrupted),
            other => other,
        }
    }
}
