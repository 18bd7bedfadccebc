//! Monitor tests

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use threadkit::{Id128, Monitor, Timeout};

use crate::helpers::timed;

#[test]
fn test_set_unblocks_wait_eq_repeatedly() {
    let value = Arc::new(Monitor::new(0i32));

    let waiter = {
        let value = Arc::clone(&value);
        thread::spawn(move || {
            for _ in 0..20 {
                assert_eq!(value.wait_eq(&5), 5);
                value.set(0);
            }
        })
    };

    for _ in 0..20 {
        value.set(5);
        // The waiter resets to 0 once it has observed 5.
        assert_eq!(value.wait_eq(&0), 0);
    }

    waiter.join().unwrap();
}

#[test]
fn test_many_waiters_released_by_one_set() {
    let gate = Arc::new(Monitor::new(false));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = Arc::clone(&gate);
            thread::spawn(move || gate.wait_flag(true, Timeout::from_millis(5_000)))
        })
        .collect();

    thread::sleep(Duration::from_millis(20));
    gate.set(true);

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

#[test]
fn test_poll_does_not_block() {
    let gate = Monitor::new(false);
    let (ready, elapsed) = timed(|| gate.wait_flag(true, Timeout::POLL));
    assert!(!ready);
    assert!(elapsed < Duration::from_millis(50));
}

#[test]
fn test_wait_until_timeout_returns_none() {
    let counter = Monitor::new(1u64);
    let (result, elapsed) =
        timed(|| counter.wait_until_timeout(|v| *v > 10, Timeout::from_millis(25)));
    assert_eq!(result, None);
    assert!(elapsed >= Duration::from_millis(25));
}

#[test]
fn test_id128_monitor_counts_up() {
    let id = Arc::new(Monitor::new(Id128::ZERO));
    let writer = Arc::clone(&id);
    let handle = thread::spawn(move || {
        for low in 1..=100u64 {
            writer.update(|v| v.low = low);
        }
        writer.update(|v| *v = Id128::new(1, 0));
    });

    assert_eq!(id.wait_ge(&Id128::new(0, u64::MAX)), Id128::new(1, 0));
    handle.join().unwrap();
}
