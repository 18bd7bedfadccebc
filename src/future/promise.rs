//! Write-once completion slot.

use std::fmt;

use super::FutureImpl;
use crate::error::{Error, Result};
use crate::monitor::Monitor;
use crate::wait::Timeout;

/// A slot some other thread fills exactly once.
///
/// Share it as `Arc<Promise<T>>`: the producer keeps one clone to call
/// [`fulfill`](Self::fulfill), consumers wrap another in a
/// [`Future`](super::Future).
pub struct Promise<T> {
    slot: Monitor<Option<Result<T>>>,
}

impl<T> Promise<T> {
    pub fn new() -> Self {
        Self {
            slot: Monitor::new(None),
        }
    }

    /// Store the outcome and wake every waiter.
    ///
    /// Returns false, leaving the first outcome in place, if the promise was
    /// already fulfilled.
    pub fn fulfill(&self, outcome: Result<T>) -> bool {
        self.slot.update(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(outcome);
            true
        })
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync> FutureImpl<T> for Promise<T> {
    fn wait_timeout(&self, timeout: Timeout) -> Result<T> {
        match self.slot.wait_until_timeout(Option::is_some, timeout) {
            Some(Some(outcome)) => outcome,
            _ => Err(Error::Timeout {
                duration_ms: timeout.as_millis(),
            }),
        }
    }

    fn is_ready(&self) -> bool {
        self.slot.with(Option::is_some)
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("fulfilled", &self.slot.with(Option::is_some))
            .finish()
    }
}
