//! Thread pool tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use threadkit::config::PoolConfig;
use threadkit::{Error, ThreadPool};

use crate::helpers::{eventually, task_delay, timed};

#[test]
fn test_drop_runs_every_queued_task() {
    let pool = ThreadPool::new(4, "drain").unwrap();
    let futures: Vec<_> = (0..100)
        .map(|i| {
            pool.post(move || {
                thread::sleep(task_delay(i));
                42
            })
        })
        .collect();

    drop(pool);

    for future in &futures {
        assert!(future.is_ready());
        assert_eq!(future.wait().unwrap(), 42);
    }
}

#[test]
fn test_drop_waits_for_detached_tasks() {
    let ran = Arc::new(AtomicUsize::new(0));
    let pool = ThreadPool::new(2, "detached").unwrap();
    for _ in 0..10 {
        let ran = Arc::clone(&ran);
        pool.post_detached(move || {
            thread::sleep(Duration::from_millis(10));
            ran.fetch_add(1, Ordering::SeqCst);
        });
    }

    // 10 tasks of 10ms on 2 workers take at least 50ms.
    let ((), elapsed) = timed(|| drop(pool));
    assert_eq!(ran.load(Ordering::SeqCst), 10);
    assert!(elapsed >= Duration::from_millis(30));
}

#[test]
fn test_tasks_run_in_parallel() {
    let pool = ThreadPool::new(4, "parallel").unwrap();
    let (futures, _) = timed(|| {
        (0..4)
            .map(|_| {
                pool.post(|| {
                    thread::sleep(Duration::from_millis(100));
                    thread::current().name().map(str::to_string)
                })
            })
            .collect::<Vec<_>>()
    });

    let (names, elapsed) = timed(|| {
        futures
            .iter()
            .map(|f| f.wait().unwrap().unwrap_or_default())
            .collect::<Vec<_>>()
    });

    assert!(elapsed < Duration::from_millis(350));
    assert!(names.iter().all(|n| n.starts_with("parallel-")));
}

#[test]
fn test_panics_are_isolated() {
    let pool = ThreadPool::new(2, "panics").unwrap();
    let failures: Vec<_> = (0..5)
        .map(|i| pool.post(move || -> usize { panic!("task {} failed", i) }))
        .collect();
    let successes: Vec<_> = (0..5).map(|i| pool.post(move || i * 2)).collect();

    for (i, future) in failures.iter().enumerate() {
        assert_eq!(
            future.wait(),
            Err(Error::Panicked(format!("task {} failed", i)))
        );
    }
    for (i, future) in successes.iter().enumerate() {
        assert_eq!(future.wait().unwrap(), i * 2);
    }

    // Counters are bumped just after the future resolves.
    assert!(eventually(Duration::from_secs(1), || {
        let stats = pool.stats();
        stats.panicked == 5 && stats.completed == 5
    }));
}

#[test]
fn test_from_config() {
    let pool = ThreadPool::from_config(&PoolConfig::new(3, "configured")).unwrap();
    assert_eq!(pool.worker_count(), 3);
    assert_eq!(pool.name(), "configured");

    let stats = serde_json::to_value(pool.stats()).unwrap();
    assert_eq!(stats["workers"], 3);
    assert_eq!(stats["queued"], 0);
}

#[test]
fn test_pool_serves_request_table() {
    use threadkit::RequestHandler;

    let handler = Arc::new(RequestHandler::<u32, u32>::new());
    let pool = ThreadPool::new(2, "server").unwrap();

    let requests: Vec<_> = (1..=10).map(|n| handler.request(n)).collect();
    for request in &requests {
        let handler = Arc::clone(&handler);
        let id = request.id();
        pool.post_detached(move || {
            let n = handler.take_payload(id).unwrap_or_default();
            handler.serve_request(id, n * n).unwrap();
        });
    }

    for (n, request) in (1..=10u32).zip(&requests) {
        assert_eq!(request.wait().unwrap(), n * n);
    }
}
