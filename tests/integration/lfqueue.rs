//! Single-producer/single-consumer queue tests

use std::thread;

use threadkit::{Full, LfQueue};

#[test]
fn test_capacity_is_exact() {
    for capacity in [1, 2, 7, 64] {
        let queue = LfQueue::with_capacity(capacity);
        for i in 0..capacity {
            assert!(queue.push(i).is_ok(), "push {} of {}", i, capacity);
        }
        assert!(queue.is_full());
        assert_eq!(queue.push(usize::MAX), Err(Full(usize::MAX)));
        assert_eq!(queue.len(), capacity);
    }
}

#[test]
fn test_fifo_across_threads() {
    const COUNT: u64 = 100_000;

    let (mut producer, mut consumer) = LfQueue::with_capacity(64).split();

    let writer = thread::spawn(move || {
        for i in 0..COUNT {
            let mut item = i;
            loop {
                match producer.push(item) {
                    Ok(()) => break,
                    Err(Full(back)) => {
                        item = back;
                        thread::yield_now();
                    }
                }
            }
        }
    });

    let reader = thread::spawn(move || {
        let mut expected = 0;
        while expected < COUNT {
            match consumer.pop() {
                Some(value) => {
                    assert_eq!(value, expected);
                    expected += 1;
                }
                None => thread::yield_now(),
            }
        }
        assert!(consumer.is_empty());
    });

    writer.join().unwrap();
    reader.join().unwrap();
}

#[test]
fn test_owned_values_cross_threads() {
    let (mut producer, mut consumer) = LfQueue::with_capacity(4).split();

    let writer = thread::spawn(move || {
        for i in 0..50 {
            let mut item = format!("message-{}", i);
            while let Err(Full(back)) = producer.push(item) {
                item = back;
                thread::yield_now();
            }
        }
    });

    let mut received = Vec::new();
    while received.len() < 50 {
        if let Some(front) = consumer.front() {
            assert_eq!(consumer.pop(), Some(front.clone()));
            received.push(front);
        } else {
            thread::yield_now();
        }
    }
    writer.join().unwrap();

    assert_eq!(received[0], "message-0");
    assert_eq!(received[49], "message-49");
}

#[test]
fn test_shared_queue_allows_one_producer_thread() {
    use std::sync::mpsc;
    use std::sync::Arc;

    let queue = Arc::new(LfQueue::with_capacity(64));
    let (claimed_tx, claimed_rx) = mpsc::channel();

    // The first thread to push becomes the producer.
    let first = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || {
            queue.push(0u64).unwrap();
            claimed_tx.send(()).unwrap();
            for i in 1..10_000u64 {
                let mut item = i;
                while let Err(Full(back)) = queue.push(item) {
                    item = back;
                    thread::yield_now();
                }
            }
        })
    };
    claimed_rx.recv().unwrap();

    let second = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.push(u64::MAX))
    };
    assert!(second.join().is_err());

    let mut expected = 0u64;
    while expected < 10_000 {
        match queue.pop() {
            Some(value) => {
                assert_eq!(value, expected);
                expected += 1;
            }
            None => thread::yield_now(),
        }
    }
    first.join().unwrap();
    assert!(queue.is_empty());
}
