//! threadkit - blocking concurrency primitives for OS threads.
//!
//! The crate bundles a handful of small, independent building blocks:
//!
//! - **Monitor**: a value guarded by a mutex and condition variable, with
//!   predicate waits (`wait_eq`, `wait_ge`, ...)
//! - **LfQueue**: bounded single-producer/single-consumer ring buffer
//! - **Future**: cloneable blocking handle over a pluggable fulfillment
//!   strategy
//! - **RequestHandler**: id-keyed table through which one thread asks
//!   another for a value and blocks for the reply
//! - **ThreadPool**: fixed worker threads draining a FIFO task queue
//!
//! Everything here blocks real threads; nothing needs an async runtime.
//!
//! # Example
//!
//! ```rust
//! use threadkit::ThreadPool;
//!
//! let pool = ThreadPool::new(2, "example").unwrap();
//! let answer = pool.post(|| 6 * 7);
//! assert_eq!(answer.wait().unwrap(), 42);
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod future;
pub mod lfqueue;
pub mod logging;
pub mod monitor;
pub mod pool;
pub mod request;
pub mod wait;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use future::{Future, FutureImpl, Promise};
pub use lfqueue::{Full, LfQueue};
pub use monitor::{Id128, Monitor};
pub use pool::{PoolStats, ThreadPool};
pub use request::{Request, RequestHandler, RequestId};
pub use wait::Timeout;
