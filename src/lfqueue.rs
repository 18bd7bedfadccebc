//! Fixed-capacity lock-free single-producer/single-consumer ring buffer.
//!
//! # Layout
//!
//! ```text
//!   read                     write
//!    │                         │
//!    ▼                         ▼
//! ┌─────┬─────┬─────┬─────┬─────┬─────┐
//! │  a  │  b  │  c  │  d  │     │     │   capacity + 1 slots
//! └─────┴─────┴─────┴─────┴─────┴─────┘
//! ```
//!
//! One slot always stays empty so that `read == write` means empty and
//! `write + 1 == read` (mod slots) means full. The producer owns `write`, the
//! consumer owns `read`; each publishes its index with a release store that
//! the other side acquires, so an item written before the index update is
//! fully visible to the consumer that observes it.
//!
//! Exactly one thread may push and exactly one thread may pop or peek. The
//! shared `&self` methods record the first pushing and first popping threads
//! and panic on calls from any other thread, in every build profile.
//! [`LfQueue::split`] hands out `&mut` endpoints that skip those checks.

use std::cell::UnsafeCell;
use std::fmt;
use std::mem::MaybeUninit;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_utils::CachePadded;

/// Returned by `push` when the queue is full; hands the item back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Recover the rejected item.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

/// Bounded SPSC queue.
pub struct LfQueue<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    read: CachePadded<AtomicUsize>,
    write: CachePadded<AtomicUsize>,
    owners: owners::ThreadOwners,
}

unsafe impl<T: Send> Send for LfQueue<T> {}
unsafe impl<T: Send> Sync for LfQueue<T> {}

impl<T> LfQueue<T> {
    /// Create a queue that holds up to `capacity` items.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        Self {
            slots: alloc_slots(capacity + 1),
            read: CachePadded::new(AtomicUsize::new(0)),
            write: CachePadded::new(AtomicUsize::new(0)),
            owners: owners::ThreadOwners::default(),
        }
    }

    /// Maximum number of items the queue holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Number of queued items. Exact only when called by one of the two
    /// endpoint threads while the other is idle.
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        (write + self.slots.len() - read) % self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read.load(Ordering::Acquire) == self.write.load(Ordering::Acquire)
    }

    pub fn is_full(&self) -> bool {
        self.next(self.write.load(Ordering::Acquire)) == self.read.load(Ordering::Acquire)
    }

    /// Append an item. Producer thread only.
    ///
    /// Leaves the queue untouched and returns the item in [`Full`] when no
    /// slot is free.
    pub fn push(&self, item: T) -> Result<(), Full<T>> {
        self.owners.check_producer();
        self.push_unchecked(item)
    }

    /// Remove the oldest item. Consumer thread only.
    pub fn pop(&self) -> Option<T> {
        self.owners.check_consumer();
        self.pop_unchecked()
    }

    /// Remove every item, dropping it. The queue must already be empty.
    pub fn clear(&mut self) {
        debug_assert!(self.is_empty(), "clear() called on a non-empty queue");
        self.drain_in_place();
        self.owners.reset();
    }

    /// Reallocate the ring for `capacity` items. The queue must be empty.
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn resize(&mut self, capacity: usize) {
        assert!(capacity > 0, "capacity must be > 0");
        debug_assert!(self.is_empty(), "resize() called on a non-empty queue");
        self.drain_in_place();
        self.slots = alloc_slots(capacity + 1);
        self.owners.reset();
    }

    /// Split into owned producer and consumer endpoints.
    pub fn split(self) -> (Producer<T>, Consumer<T>) {
        let queue = Arc::new(self);
        (
            Producer {
                queue: Arc::clone(&queue),
            },
            Consumer { queue },
        )
    }

    #[inline]
    fn next(&self, index: usize) -> usize {
        let next = index + 1;
        if next == self.slots.len() {
            0
        } else {
            next
        }
    }

    fn push_unchecked(&self, item: T) -> Result<(), Full<T>> {
        // Only the producer stores `write`.
        let write = self.write.load(Ordering::Relaxed);
        let next = self.next(write);
        if next == self.read.load(Ordering::Acquire) {
            return Err(Full(item));
        }

        unsafe { (*self.slots[write].get()).write(item) };
        self.write.store(next, Ordering::Release);
        Ok(())
    }

    fn pop_unchecked(&self) -> Option<T> {
        // Only the consumer stores `read`.
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        let item = unsafe { (*self.slots[read].get()).assume_init_read() };
        self.read.store(self.next(read), Ordering::Release);
        Some(item)
    }

    fn drain_in_place(&mut self) {
        let len = self.slots.len();
        let write = *self.write.get_mut();
        let mut read = *self.read.get_mut();
        while read != write {
            unsafe { self.slots[read].get_mut().assume_init_drop() };
            read = (read + 1) % len;
        }
        *self.read.get_mut() = 0;
        *self.write.get_mut() = 0;
    }
}

impl<T: Clone> LfQueue<T> {
    /// Copy of the oldest item without consuming it. Consumer thread only.
    pub fn front(&self) -> Option<T> {
        self.owners.check_consumer();
        self.front_unchecked()
    }

    fn front_unchecked(&self) -> Option<T> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }
        // The producer never touches a published slot until `read` moves past it.
        Some(unsafe { (*self.slots[read].get()).assume_init_ref() }.clone())
    }
}

impl<T> Drop for LfQueue<T> {
    fn drop(&mut self) {
        self.drain_in_place();
    }
}

impl<T> fmt::Debug for LfQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfQueue")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .finish()
    }
}

fn alloc_slots<T>(count: usize) -> Box<[UnsafeCell<MaybeUninit<T>>]> {
    (0..count)
        .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
        .collect::<Vec<_>>()
        .into_boxed_slice()
}

/// Pushing half of a split [`LfQueue`].
pub struct Producer<T> {
    queue: Arc<LfQueue<T>>,
}

impl<T> Producer<T> {
    pub fn push(&mut self, item: T) -> Result<(), Full<T>> {
        self.queue.push_unchecked(item)
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }
}

/// Popping half of a split [`LfQueue`].
pub struct Consumer<T> {
    queue: Arc<LfQueue<T>>,
}

impl<T> Consumer<T> {
    pub fn pop(&mut self) -> Option<T> {
        self.queue.pop_unchecked()
    }

    pub fn capacity(&self) -> usize {
        self.queue.capacity()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl<T: Clone> Consumer<T> {
    pub fn front(&self) -> Option<T> {
        self.queue.front_unchecked()
    }
}

mod owners {
    use std::sync::OnceLock;
    use std::thread::{self, ThreadId};

    /// First pushing and first popping thread.
    #[derive(Default)]
    pub(super) struct ThreadOwners {
        producer: OnceLock<ThreadId>,
        consumer: OnceLock<ThreadId>,
    }

    impl ThreadOwners {
        #[track_caller]
        pub(super) fn check_producer(&self) {
            let current = thread::current().id();
            let owner = *self.producer.get_or_init(|| current);
            assert_eq!(owner, current, "LfQueue pushed from a second producer thread");
        }

        #[track_caller]
        pub(super) fn check_consumer(&self) {
            let current = thread::current().id();
            let owner = *self.consumer.get_or_init(|| current);
            assert_eq!(owner, current, "LfQueue popped from a second consumer thread");
        }

        pub(super) fn reset(&mut self) {
            self.producer = OnceLock::new();
            self.consumer = OnceLock::new();
        }
    }
}
