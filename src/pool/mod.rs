//! Worker thread pool.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                      ThreadPool                            │
//! ├────────────────────────────────────────────────────────────┤
//! │  ┌─────────┐    ┌─────────┐    ┌─────────┐                 │
//! │  │ Worker0 │    │ Worker1 │    │ Worker2 │  ...            │
//! │  └────┬────┘    └────┬────┘    └────┬────┘                 │
//! │       │              │              │                      │
//! │       └──────────────┴──────────────┘                      │
//! │                      │                                     │
//! │              ┌───────▼───────┐                             │
//! │              │ Mutex<VecDeque│  + Condvar + stop flag      │
//! │              └───────┬───────┘                             │
//! │                      │                                     │
//! │              ┌───────▼───────┐                             │
//! │              │    post()     │  → Future<T>                │
//! │              └───────────────┘                             │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dropping the pool stops it: workers finish every task queued before the
//! drop began, then exit, and the drop joins them.

mod thread;

pub use thread::ThreadPool;

use serde::Serialize;

/// Snapshot of pool activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Number of worker threads.
    pub workers: usize,
    /// Tasks waiting in the queue.
    pub queued: usize,
    /// Tasks that ran to completion.
    pub completed: u64,
    /// Tasks that panicked.
    pub panicked: u64,
}
