//! Function-backed future, computed once on first wait.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Mutex, OnceLock};

use super::FutureImpl;
use crate::error::{Error, Result};
use crate::wait::{lock, Timeout};

type Computation<T> = Box<dyn FnOnce() -> T + Send>;

/// Runs its computation on the thread that first waits and memoizes the
/// outcome.
///
/// Concurrent first callers block until the single invocation finishes. The
/// computation runs on a waiting thread, so `wait_timeout` cannot bound it and
/// behaves like `wait`. A panic is captured and memoized as
/// [`Error::Panicked`].
pub struct FunctionFuture<T> {
    func: Mutex<Option<Computation<T>>>,
    value: OnceLock<Result<T>>,
}

impl<T> FunctionFuture<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self {
            func: Mutex::new(Some(Box::new(f))),
            value: OnceLock::new(),
        }
    }

    fn resolve(&self) -> &Result<T> {
        self.value.get_or_init(|| match lock(&self.func).take() {
            Some(f) => panic::catch_unwind(AssertUnwindSafe(f)).map_err(Error::from_panic),
            None => Err(Error::Panicked("computation already consumed".to_string())),
        })
    }
}

impl<T: Clone + Send + Sync> FutureImpl<T> for FunctionFuture<T> {
    fn wait_timeout(&self, _timeout: Timeout) -> Result<T> {
        self.resolve().clone()
    }

    fn is_ready(&self) -> bool {
        self.value.get().is_some()
    }
}

impl<T> fmt::Debug for FunctionFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionFuture")
            .field("ready", &self.value.get().is_some())
            .finish()
    }
}
