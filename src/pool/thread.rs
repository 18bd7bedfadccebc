//! Thread pool implementation.

use std::collections::VecDeque;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use super::PoolStats;
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::future::{Future, Promise};
use crate::wait::{lock, wait_while, Timeout};

/// A queued unit of work. Returns false if the user closure panicked.
type Task = Box<dyn FnOnce() -> bool + Send + 'static>;

struct Queue {
    tasks: VecDeque<Task>,
    stop: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
    completed: AtomicU64,
    panicked: AtomicU64,
}

/// Fixed set of worker threads draining a shared FIFO queue.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    name: String,
}

impl ThreadPool {
    /// Create a pool.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads (0 = use CPU count)
    /// * `name` - Prefix for worker thread names and log records
    pub fn new(num_workers: usize, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let num_workers = if num_workers == 0 {
            num_cpus::get()
        } else {
            num_workers
        };

        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                tasks: VecDeque::new(),
                stop: false,
            }),
            available: Condvar::new(),
            completed: AtomicU64::new(0),
            panicked: AtomicU64::new(0),
        });

        let mut pool = Self {
            shared,
            workers: Vec::with_capacity(num_workers),
            name,
        };

        for id in 0..num_workers {
            let shared = Arc::clone(&pool.shared);
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", pool.name, id))
                .spawn(move || worker_loop(id, shared));

            match spawned {
                Ok(handle) => pool.workers.push(handle),
                // Dropping `pool` stops the workers spawned so far.
                Err(e) => return Err(Error::Spawn(e.to_string())),
            }
        }

        tracing::info!(pool = %pool.name, workers = num_workers, "thread pool created");
        Ok(pool)
    }

    /// Create a pool sized and named by `config`.
    pub fn from_config(config: &PoolConfig) -> Result<Self> {
        Self::new(config.worker_count(), config.name.clone())
    }

    /// Queue `task` and return a future for its result.
    ///
    /// A panic inside `task` resolves the future with [`Error::Panicked`].
    pub fn post<F, T>(&self, task: F) -> Future<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Clone + Send + Sync + 'static,
    {
        let promise = Arc::new(Promise::new());
        let producer = Arc::clone(&promise);

        self.enqueue(Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task)).map_err(Error::from_panic);
            let ok = outcome.is_ok();
            producer.fulfill(outcome);
            ok
        }));

        Future::from_arc(promise)
    }

    /// Queue `task` without a result handle. Panics are logged.
    pub fn post_detached<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let pool = self.name.clone();
        self.enqueue(Box::new(move || {
            match panic::catch_unwind(AssertUnwindSafe(task)) {
                Ok(()) => true,
                Err(payload) => {
                    let err = Error::from_panic(payload);
                    tracing::error!(pool = %pool, error = %err, "detached task panicked");
                    false
                }
            }
        }));
    }

    /// Whether tasks are waiting in the queue. A snapshot; it may be stale
    /// by the time the caller looks at it.
    pub fn has_pending_jobs(&self) -> bool {
        !lock(&self.shared.queue).tasks.is_empty()
    }

    /// Number of tasks waiting in the queue.
    pub fn pending_count(&self) -> usize {
        lock(&self.shared.queue).tasks.len()
    }

    /// Get the number of workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Get the pool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of pool activity.
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            workers: self.workers.len(),
            queued: self.pending_count(),
            completed: self.shared.completed.load(Ordering::Relaxed),
            panicked: self.shared.panicked.load(Ordering::Relaxed),
        }
    }

    fn enqueue(&self, task: Task) {
        {
            let mut queue = lock(&self.shared.queue);
            debug_assert!(!queue.stop, "task posted to a stopping pool");
            queue.tasks.push_back(task);
        }
        self.shared.available.notify_one();
    }
}

/// Worker thread main loop.
fn worker_loop(id: usize, shared: Arc<Shared>) {
    tracing::debug!(worker = id, "worker started");

    loop {
        let task = {
            let (mut queue, _) = wait_while(
                &shared.available,
                lock(&shared.queue),
                Timeout::INFINITE,
                |queue| queue.tasks.is_empty() && !queue.stop,
            );
            match queue.tasks.pop_front() {
                Some(task) => task,
                // Stop requested and nothing left to drain.
                None => break,
            }
        };

        if task() {
            shared.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            shared.panicked.fetch_add(1, Ordering::Relaxed);
        }
    }

    tracing::debug!(worker = id, "worker stopped");
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        lock(&self.shared.queue).stop = true;
        self.shared.available.notify_all();

        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                tracing::error!(pool = %self.name, "worker thread panicked");
            }
        }

        tracing::info!(
            pool = %self.name,
            completed = self.shared.completed.load(Ordering::Relaxed),
            panicked = self.shared.panicked.load(Ordering::Relaxed),
            "thread pool stopped"
        );
    }
}

impl fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("name", &self.name)
            .field("workers", &self.workers.len())
            .field("pending", &self.pending_count())
            .finish()
    }
}
