//! Blocking monitor variable.
//!
//! A [`Monitor`] pairs a value with a mutex and a condition variable. Every
//! write wakes all waiters, and every wait re-checks its predicate before
//! blocking and after each wakeup, so a write can never be missed.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use threadkit::Monitor;
//!
//! let state = Arc::new(Monitor::new(0));
//! let writer = Arc::clone(&state);
//! let handle = thread::spawn(move || writer.set(5));
//!
//! assert_eq!(state.wait_eq(&5), 5);
//! handle.join().unwrap();
//! ```

use std::fmt;
use std::sync::{Condvar, Mutex};

use crate::wait::{lock, wait_while, Timeout};

/// A value that threads can block on until it satisfies a condition.
pub struct Monitor<T> {
    value: Mutex<T>,
    changed: Condvar,
}

impl<T> Monitor<T> {
    /// Create a monitor holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            value: Mutex::new(value),
            changed: Condvar::new(),
        }
    }

    /// Replace the held value and wake every waiter.
    pub fn set(&self, value: T) {
        *lock(&self.value) = value;
        self.changed.notify_all();
    }

    /// Mutate the held value in place and wake every waiter.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let result = f(&mut lock(&self.value));
        self.changed.notify_all();
        result
    }

    /// Read the held value under the lock without notifying anyone.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.value))
    }

    /// Block until `pred` holds or `timeout` elapses, then run `f` on the
    /// value under the same lock.
    ///
    /// Returns `None` on timeout.
    pub fn wait_with<R>(
        &self,
        mut pred: impl FnMut(&T) -> bool,
        timeout: Timeout,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        let (guard, timed_out) =
            wait_while(&self.changed, lock(&self.value), timeout, |v| !pred(v));
        if timed_out {
            None
        } else {
            Some(f(&guard))
        }
    }

    /// Consume the monitor and return the held value.
    pub fn into_inner(self) -> T {
        self.value
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T: Clone> Monitor<T> {
    /// Snapshot of the held value.
    pub fn get(&self) -> T {
        lock(&self.value).clone()
    }

    /// Block until `pred` holds and return the value that satisfied it.
    pub fn wait_until(&self, mut pred: impl FnMut(&T) -> bool) -> T {
        let (guard, _) = wait_while(&self.changed, lock(&self.value), Timeout::INFINITE, |v| {
            !pred(v)
        });
        guard.clone()
    }

    /// Like [`wait_until`](Self::wait_until), giving up after `timeout`.
    ///
    /// Returns `None` if the timeout elapsed before `pred` held.
    pub fn wait_until_timeout(&self, pred: impl FnMut(&T) -> bool, timeout: Timeout) -> Option<T> {
        self.wait_with(pred, timeout, T::clone)
    }
}

impl<T: Clone + PartialEq> Monitor<T> {
    /// Block until the value equals `target`.
    pub fn wait_eq(&self, target: &T) -> T {
        self.wait_until(|v| v == target)
    }

    /// Block until the value differs from `target`.
    pub fn wait_ne(&self, target: &T) -> T {
        self.wait_until(|v| v != target)
    }
}

impl<T: Clone + PartialOrd> Monitor<T> {
    /// Block until the value is `>= target`.
    pub fn wait_ge(&self, target: &T) -> T {
        self.wait_until(|v| v >= target)
    }

    /// Block until the value is `<= target`.
    pub fn wait_le(&self, target: &T) -> T {
        self.wait_until(|v| v <= target)
    }

    /// Block until the value is `> target`.
    pub fn wait_gt(&self, target: &T) -> T {
        self.wait_until(|v| v > target)
    }

    /// Block until the value is `< target`.
    pub fn wait_lt(&self, target: &T) -> T {
        self.wait_until(|v| v < target)
    }
}

impl Monitor<bool> {
    /// Wait for the flag to read `expected`.
    ///
    /// Returns `false` if `timeout` elapsed first.
    pub fn wait_flag(&self, expected: bool, timeout: Timeout) -> bool {
        self.wait_until_timeout(|v| *v == expected, timeout).is_some()
    }
}

impl<T: Default> Default for Monitor<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Monitor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor")
            .field("value", &*lock(&self.value))
            .finish()
    }
}

/// 128-bit identifier ordered lexicographically on `(high, low)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Id128 {
    pub high: u64,
    pub low: u64,
}

impl Id128 {
    pub const ZERO: Id128 = Id128 { high: 0, low: 0 };

    pub const fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    pub const fn from_u128(value: u128) -> Self {
        Self {
            high: (value >> 64) as u64,
            low: value as u64,
        }
    }

    pub const fn as_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }
}

impl fmt::Display for Id128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}{:016x}", self.high, self.low)
    }
}
