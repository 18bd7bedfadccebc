//! Logging configuration.

use super::parse::env_or;
use super::ConfigError;

const DEFAULT_FILTER: &str = "threadkit=info";

/// Logging configuration loaded from environment.
#[derive(Clone, Debug)]
pub struct LoggingConfig {
    /// `tracing` filter directive handed to `EnvFilter`.
    pub filter: String,
    /// Service name for structured logging.
    pub service_name: String,
}

impl LoggingConfig {
    /// Load configuration from environment variables.
    ///
    /// The filter comes from the first source that yields one:
    /// `LOG_LEVEL` (a bare level applied to this crate), then `RUST_LOG`
    /// (full directive syntax), then `threadkit=info`. `SERVICE_NAME`
    /// defaults to `threadkit`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let from_level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|level| level_directive(&level));
        let filter = from_level
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());

        Ok(Self {
            filter,
            service_name: env_or("SERVICE_NAME", "threadkit"),
        })
    }
}

/// Turn a bare level name into a crate-scoped directive.
///
/// Unknown names are reported on stderr (no subscriber exists yet) and
/// yield `None`.
fn level_directive(level: &str) -> Option<String> {
    let level = level.trim().to_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Some(format!("threadkit={}", level)),
        _ => {
            eprintln!(
                "Warning: Invalid LOG_LEVEL '{}', expected: trace, debug, info, warn, error",
                level
            );
            None
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            service_name: "threadkit".to_string(),
        }
    }
}
