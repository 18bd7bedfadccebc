//! Timeouts and the condvar plumbing shared by every blocking primitive.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How long a blocking call may wait.
///
/// Built from milliseconds with the usual sentinels: `0` polls without
/// blocking and `u64::MAX` waits indefinitely.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timeout(Option<Duration>);

impl Timeout {
    /// Wait until the condition holds, however long that takes.
    pub const INFINITE: Timeout = Timeout(None);

    /// Check the condition once and return immediately.
    pub const POLL: Timeout = Timeout(Some(Duration::ZERO));

    /// Timeout from milliseconds (`u64::MAX` means infinite).
    pub const fn from_millis(ms: u64) -> Self {
        if ms == u64::MAX {
            Timeout::INFINITE
        } else {
            Timeout(Some(Duration::from_millis(ms)))
        }
    }

    /// Timeout from a duration.
    pub const fn from_duration(duration: Duration) -> Self {
        Timeout(Some(duration))
    }

    /// Returns true for the indefinite timeout.
    #[inline]
    pub fn is_infinite(&self) -> bool {
        self.0.is_none()
    }

    /// Returns true for the zero timeout.
    #[inline]
    pub fn is_poll(&self) -> bool {
        self.0 == Some(Duration::ZERO)
    }

    /// The bounded duration, or `None` for infinite.
    #[inline]
    pub fn as_duration(&self) -> Option<Duration> {
        self.0
    }

    /// Milliseconds, saturating; `u64::MAX` for infinite.
    pub fn as_millis(&self) -> u64 {
        match self.0 {
            Some(d) => u64::try_from(d.as_millis()).unwrap_or(u64::MAX - 1),
            None => u64::MAX,
        }
    }
}

impl From<Duration> for Timeout {
    fn from(duration: Duration) -> Self {
        Timeout::from_duration(duration)
    }
}

impl From<Option<Duration>> for Timeout {
    fn from(duration: Option<Duration>) -> Self {
        Timeout(duration)
    }
}

impl fmt::Debug for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("Timeout(infinite)"),
            Some(d) => write!(f, "Timeout({}ms)", d.as_millis()),
        }
    }
}

/// Lock a mutex, recovering the guard if a previous holder panicked.
///
/// User code never runs while these locks are held, so a poisoned lock still
/// guards consistent data.
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Block on `cv` while `condition` holds, up to `timeout`.
///
/// Returns the guard and `true` if the timeout elapsed with the condition
/// still holding.
pub(crate) fn wait_while<'a, T, F>(
    cv: &Condvar,
    guard: MutexGuard<'a, T>,
    timeout: Timeout,
    mut condition: F,
) -> (MutexGuard<'a, T>, bool)
where
    F: FnMut(&mut T) -> bool,
{
    match timeout.as_duration() {
        None => {
            let guard = cv
                .wait_while(guard, condition)
                .unwrap_or_else(PoisonError::into_inner);
            (guard, false)
        }
        Some(d) if d.is_zero() => {
            let mut guard = guard;
            let pending = condition(&mut guard);
            (guard, pending)
        }
        Some(d) => {
            let (guard, result) = cv
                .wait_timeout_while(guard, d, condition)
                .unwrap_or_else(PoisonError::into_inner);
            (guard, result.timed_out())
        }
    }
}
