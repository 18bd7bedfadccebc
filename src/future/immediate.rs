//! Pre-resolved future.

use super::FutureImpl;
use crate::error::Result;
use crate::wait::Timeout;

/// A future constructed with its value.
#[derive(Debug, Clone)]
pub struct Immediate<T> {
    value: T,
}

impl<T> Immediate<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Clone + Send + Sync> FutureImpl<T> for Immediate<T> {
    fn wait_timeout(&self, _timeout: Timeout) -> Result<T> {
        Ok(self.value.clone())
    }

    fn is_ready(&self) -> bool {
        true
    }
}
