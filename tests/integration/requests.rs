//! Request handler tests

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use threadkit::config::RequestConfig;
use threadkit::{Error, RequestHandler, Timeout};

use crate::helpers::timed;

#[test]
fn test_served_value_is_repeatable() {
    let handler = Arc::new(RequestHandler::<(), String>::new());
    let id = handler.register_request(());

    let producer = Arc::clone(&handler);
    let server = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        producer.serve_request(id, "served".to_string()).unwrap();
    });

    for _ in 0..3 {
        assert_eq!(
            handler.wait_request(id, Timeout::INFINITE).unwrap(),
            "served"
        );
    }
    thread::sleep(Duration::from_millis(10));
    assert_eq!(handler.wait_request(id, Timeout::POLL).unwrap(), "served");

    server.join().unwrap();
    assert!(handler.release_request(id));
    assert!(handler.is_empty());
}

#[test]
fn test_unregistered_request_fails_every_wait() {
    let handler = Arc::new(RequestHandler::<(), i32>::new());
    let request = handler.request(());
    let id = request.id();
    request.unregister();

    for _ in 0..3 {
        assert_eq!(request.wait(), Err(Error::Unregistered(id)));
    }

    // A late producer is ignored.
    assert!(handler.serve_request(id, 1).is_ok());
    assert_eq!(request.wait(), Err(Error::Unregistered(id)));

    let ((), elapsed) = timed(|| drop(request));
    assert!(elapsed < Duration::from_millis(100));
    assert!(handler.is_empty());
}

#[test]
fn test_unregister_wakes_blocked_waiter() {
    let handler = Arc::new(RequestHandler::<(), i32>::new());
    let id = handler.register_request(());

    let waiter = {
        let handler = Arc::clone(&handler);
        thread::spawn(move || handler.wait_request(id, Timeout::INFINITE))
    };

    thread::sleep(Duration::from_millis(20));
    assert!(handler.unregister_request(id));
    assert_eq!(waiter.join().unwrap(), Err(Error::Unregistered(id)));
}

#[test]
fn test_many_concurrent_requests() {
    let handler = Arc::new(RequestHandler::<usize, usize>::new());
    let requests: Vec<_> = (0..200).map(|i| handler.request(i)).collect();
    assert_eq!(handler.pending_requests().len(), 200);

    let producers: Vec<_> = (0..4)
        .map(|shard| {
            let handler = Arc::clone(&handler);
            let ids: Vec<_> = requests
                .iter()
                .skip(shard)
                .step_by(4)
                .map(|r| r.id())
                .collect();
            thread::spawn(move || {
                for id in ids {
                    let payload = handler.take_payload(id).unwrap();
                    handler.serve_request(id, payload + 1000).unwrap();
                }
            })
        })
        .collect();

    for (i, request) in requests.iter().enumerate() {
        assert_eq!(request.wait().unwrap(), i + 1000);
    }
    for producer in producers {
        producer.join().unwrap();
    }

    assert!(handler.pending_requests().is_empty());
    drop(requests);
    assert!(handler.is_empty());
}

#[test]
fn test_default_timeout_from_config() {
    let config = RequestConfig {
        default_timeout: Timeout::from_millis(20),
    };
    let handler = Arc::new(RequestHandler::<(), i32>::with_config(&config));
    let request = handler.request(());

    let (result, elapsed) = timed(|| request.wait());
    assert_eq!(result, Err(Error::Timeout { duration_ms: 20 }));
    assert!(elapsed >= Duration::from_millis(20));

    handler.serve_request(request.id(), 9).unwrap();
    assert_eq!(request.wait().unwrap(), 9);
}

#[test]
fn test_unknown_request() {
    let handler = RequestHandler::<(), i32>::new();
    let id = handler.register_request(());
    assert!(handler.release_request(id));
    assert_eq!(handler.serve_request(id, 1), Err(Error::UnknownRequest(id)));
    assert_eq!(
        handler.wait_request(id, Timeout::POLL),
        Err(Error::UnknownRequest(id))
    );
    assert!(!handler.is_request_ready(id));
}
