//! Request handler configuration.

use super::parse::env_duration;
use super::ConfigError;
use crate::wait::Timeout;

/// Request handler configuration loaded from environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestConfig {
    /// Timeout used by `Request::wait` (infinite by default).
    pub default_timeout: Timeout,
}

impl RequestConfig {
    /// Load configuration from environment variables.
    ///
    /// `THREADKIT_REQUEST_TIMEOUT` accepts `500ms`, `30s`, `2m` or `off`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let default_timeout = env_duration("THREADKIT_REQUEST_TIMEOUT", "off")?.into();
        Ok(Self { default_timeout })
    }
}
