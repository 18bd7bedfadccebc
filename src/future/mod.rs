//! Blocking futures.
//!
//! A [`Future`] is a cheap, cloneable handle to a value that some strategy
//! will eventually produce. The strategy lives behind [`FutureImpl`]:
//!
//! | Strategy | Type | Resolved by |
//! |----------|------|-------------|
//! | immediate | [`Immediate`] | construction |
//! | function-backed | [`FunctionFuture`] | first `wait`, memoized |
//! | promise | [`Promise`] | whoever calls [`Promise::fulfill`] (pool workers) |
//! | request-backed | [`RequestFuture`](crate::request::RequestFuture) | `RequestHandler::serve_request` |
//!
//! These are plain blocking handles for OS threads; they are unrelated to
//! `std::future::Future` and need no executor.
//!
//! Comparison operators force resolution: `future == 5` waits for the value.
//! A future whose wait fails compares unequal to everything and has no
//! ordering.

mod function;
mod immediate;
mod promise;

pub use function::FunctionFuture;
pub use immediate::Immediate;
pub use promise::Promise;

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::wait::Timeout;

/// Fulfillment strategy behind a [`Future`].
///
/// Once `wait` has returned `Ok`, `is_ready` must stay true and later waits
/// must return an equal value without blocking.
pub trait FutureImpl<T>: Send + Sync {
    /// Block until the value is available.
    fn wait(&self) -> Result<T> {
        self.wait_timeout(Timeout::INFINITE)
    }

    /// Block for at most `timeout`; `Error::Timeout` if it elapses.
    fn wait_timeout(&self, timeout: Timeout) -> Result<T>;

    /// Non-blocking readiness check.
    fn is_ready(&self) -> bool;
}

/// Shared handle to an eventually available value.
pub struct Future<T> {
    inner: Arc<dyn FutureImpl<T>>,
}

impl<T> Future<T> {
    /// Wrap a shared strategy.
    pub fn from_arc(inner: Arc<dyn FutureImpl<T>>) -> Self {
        Self { inner }
    }

    /// Wrap an owned strategy.
    pub fn from_impl<I>(inner: I) -> Self
    where
        I: FutureImpl<T> + 'static,
    {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Block until the value is available.
    pub fn wait(&self) -> Result<T> {
        self.inner.wait()
    }

    /// Block for at most `timeout`.
    pub fn wait_timeout(&self, timeout: Timeout) -> Result<T> {
        self.inner.wait_timeout(timeout)
    }

    /// Non-blocking readiness check.
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }
}

impl<T> Future<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// An already resolved future.
    pub fn ready(value: T) -> Self {
        Self::from_impl(Immediate::new(value))
    }

    /// A future computed by `f` on the first `wait`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        Self::from_impl(FunctionFuture::new(f))
    }
}

impl<T: Default + PartialEq> Future<T> {
    /// Boolean conversion: waits, then tests the value against `T::default()`.
    ///
    /// A failed wait is false.
    pub fn is_truthy(&self) -> bool {
        matches!(self.wait(), Ok(v) if v != T::default())
    }
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Future")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl<T: PartialEq> PartialEq for Future<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.wait(), other.wait()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

impl<T: PartialEq> PartialEq<T> for Future<T> {
    fn eq(&self, other: &T) -> bool {
        matches!(self.wait(), Ok(ref v) if v == other)
    }
}

impl<T: PartialOrd> PartialOrd for Future<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.wait(), other.wait()) {
            (Ok(a), Ok(b)) => a.partial_cmp(&b),
            _ => None,
        }
    }
}

impl<T: PartialOrd> PartialOrd<T> for Future<T> {
    fn partial_cmp(&self, other: &T) -> Option<Ordering> {
        self.wait().ok()?.partial_cmp(other)
    }
}
