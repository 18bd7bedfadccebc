//! Thread pool configuration.

use std::num::NonZeroUsize;

use super::parse::{env_or, env_parse};
use super::ConfigError;

/// Thread pool configuration loaded from environment.
///
/// The worker count is resolved at construction time, so `0` never escapes.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Prefix for worker thread names.
    pub name: String,
    /// Resolved worker count (never zero).
    workers: NonZeroUsize,
}

impl PoolConfig {
    /// Build a configuration directly; `workers == 0` means CPU count.
    pub fn new(workers: usize, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            workers: Self::resolve_workers(workers),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `THREADKIT_WORKERS`: worker count, `0` = CPU count (default `0`)
    /// - `THREADKIT_POOL_NAME`: thread name prefix (default `threadkit`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let workers: usize = env_parse("THREADKIT_WORKERS", 0)?;

        let name = env_or("THREADKIT_POOL_NAME", "threadkit");
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "THREADKIT_POOL_NAME".into(),
                message: "must not be empty".into(),
            });
        }

        Ok(Self::new(workers, name))
    }

    /// Get worker count (pre-computed, never zero).
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers.get()
    }

    fn resolve_workers(requested: usize) -> NonZeroUsize {
        NonZeroUsize::new(requested)
            .or_else(|| NonZeroUsize::new(num_cpus::get()))
            .unwrap_or(NonZeroUsize::MIN)
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(0, "threadkit")
    }
}
