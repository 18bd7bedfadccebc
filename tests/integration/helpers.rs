//! Test helpers and utilities

use std::thread;
use std::time::{Duration, Instant};

/// Run `f` and return its result together with the elapsed wall time.
pub fn timed<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Poll `check` every millisecond until it holds or `limit` elapses.
pub fn eventually(limit: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + limit;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    check()
}

/// Deterministic per-task delay in `[50, 100]` ms.
pub fn task_delay(i: usize) -> Duration {
    Duration::from_millis(50 + (i * 37 % 51) as u64)
}
