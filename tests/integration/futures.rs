//! Future strategy tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use threadkit::{Future, Promise, RequestHandler, ThreadPool, Timeout};

fn assert_settles<T>(future: &Future<T>, expected: T)
where
    T: PartialEq + std::fmt::Debug,
{
    assert_eq!(future.wait().unwrap(), expected);
    assert!(future.is_ready());
    assert_eq!(future.wait().unwrap(), expected);
}

#[test]
fn test_immediate_is_always_ready() {
    let future = Future::ready("now");
    assert!(future.is_ready());
    assert_settles(&future, "now");
}

#[test]
fn test_function_future_lifecycle() {
    let future = Future::from_fn(|| 7u8);
    assert!(!future.is_ready());
    assert_settles(&future, 7);
}

#[test]
fn test_function_runs_once_under_concurrent_waiters() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let future = Future::from_fn(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        "computed".to_string()
    });

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let future = future.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                future.wait().unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "computed");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_promise_lifecycle() {
    let promise = Arc::new(Promise::<f64>::new());
    let future = Future::from_arc(promise.clone());
    assert!(!future.is_ready());
    assert!(future
        .wait_timeout(Timeout::from_millis(5))
        .unwrap_err()
        .is_timeout());

    let producer = Arc::clone(&promise);
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        producer.fulfill(Ok(3.5f64))
    });

    assert_settles(&future, 3.5);
    assert!(handle.join().unwrap());
    assert!(!promise.fulfill(Ok(0.0)));
    assert_settles(&future, 3.5);
}

#[test]
fn test_pool_future_lifecycle() {
    let pool = ThreadPool::new(1, "futures").unwrap();
    let future = pool.post(|| {
        thread::sleep(Duration::from_millis(30));
        vec![1, 2]
    });
    assert!(!future.is_ready());
    assert_settles(&future, vec![1, 2]);
}

#[test]
fn test_request_future_lifecycle() {
    let handler = Arc::new(RequestHandler::<(), i64>::new());
    let request = handler.request(());
    let id = request.id();
    let future = request.into_future();
    assert!(!future.is_ready());

    let producer = Arc::clone(&handler);
    let handle = thread::spawn(move || producer.serve_request(id, -1));

    assert_settles(&future, -1);
    handle.join().unwrap().unwrap();
}

#[test]
fn test_comparisons_force_resolution() {
    let pool = ThreadPool::new(2, "compare").unwrap();
    let a = pool.post(|| 10);
    let b = pool.post(|| 20);

    assert!(a < b);
    assert!(a == 10);
    assert!(b >= 20);
    assert!(a.is_truthy());
    assert!(!pool.post(|| 0).is_truthy());
}
