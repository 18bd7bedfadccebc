//! Configuration module for threadkit.
//!
//! Loads optional settings from environment variables. Core types never read
//! the environment on their own; callers pass these structs in explicitly.
//!
//! # Example
//!
//! ```rust,no_run
//! use threadkit::config::Config;
//! use threadkit::ThreadPool;
//!
//! let config = Config::from_env().unwrap();
//! let pool = ThreadPool::from_config(&config.pool).unwrap();
//! println!("Workers: {}", pool.worker_count());
//! ```

mod error;
mod logging;
mod parse;
mod pool;
mod request;

pub use error::ConfigError;
pub use logging::LoggingConfig;
pub use parse::parse_duration;
pub use pool::PoolConfig;
pub use request::RequestConfig;

/// Complete configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Thread pool configuration.
    pub pool: PoolConfig,
    /// Request handler configuration.
    pub request: RequestConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            pool: PoolConfig::from_env()?,
            request: RequestConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Pool: {}", self.pool.name);
        info!("  Workers: {}", self.pool.worker_count());

        match self.request.default_timeout.as_duration() {
            Some(timeout) => info!("  Request timeout: {}ms", timeout.as_millis()),
            None => info!("  Request timeout: disabled"),
        }

        info!("  Log filter: {}", self.logging.filter);
    }
}
