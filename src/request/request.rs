//! Owning handle over one request-table entry.

use std::fmt;
use std::sync::{Arc, Mutex};

use super::{RequestHandler, RequestId};
use crate::error::{Error, Result};
use crate::future::{Future, FutureImpl};
use crate::wait::{lock, Timeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unresolved,
    Done,
    Unregistered,
}

/// Request-backed future strategy.
///
/// When the last handle goes away an unresolved request blocks until it is
/// served, so the producer never resolves an entry nobody reclaims; the
/// entry is then released. Call [`unregister`](Self::unregister) first to
/// skip the wait.
pub struct RequestFuture<P, T> {
    handler: Arc<RequestHandler<P, T>>,
    id: RequestId,
    state: Mutex<State>,
}

impl<P, T> RequestFuture<P, T> {
    /// Identifier a producer thread passes to `serve_request`.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Cancel the request. No effect once it is resolved or already
    /// unregistered.
    pub fn unregister(&self) {
        let mut state = lock(&self.state);
        if *state == State::Unresolved && self.handler.unregister_request(self.id) {
            *state = State::Unregistered;
        }
    }
}

impl<P, T> FutureImpl<T> for RequestFuture<P, T>
where
    P: Send,
    T: Clone + Send + Sync,
{
    fn wait_timeout(&self, timeout: Timeout) -> Result<T> {
        if *lock(&self.state) == State::Unregistered {
            return Err(Error::Unregistered(self.id));
        }

        let outcome = self.handler.wait_request(self.id, timeout);
        let mut state = lock(&self.state);
        match &outcome {
            Ok(_) => *state = State::Done,
            Err(Error::Unregistered(_)) => *state = State::Unregistered,
            Err(_) => {}
        }
        outcome
    }

    fn is_ready(&self) -> bool {
        match *lock(&self.state) {
            State::Done => true,
            State::Unregistered => false,
            State::Unresolved => self.handler.is_request_ready(self.id),
        }
    }
}

impl<P, T> Drop for RequestFuture<P, T> {
    fn drop(&mut self) {
        let state = *self
            .state
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if state == State::Unresolved {
            tracing::trace!(request = %self.id, "waiting for unresolved request before release");
            self.handler.wait_until_settled(self.id);
        }
        self.handler.release_request(self.id);
    }
}

impl<P, T> fmt::Debug for RequestFuture<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestFuture")
            .field("id", &self.id)
            .field("state", &*lock(&self.state))
            .finish()
    }
}

/// A registered request that owns its table entry.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use threadkit::RequestHandler;
///
/// let handler = Arc::new(RequestHandler::<u32, u32>::new());
/// let request = handler.request(20);
///
/// let producer = Arc::clone(&handler);
/// let id = request.id();
/// thread::spawn(move || {
///     let input = producer.take_payload(id).unwrap();
///     producer.serve_request(id, input * 2).unwrap();
/// });
///
/// assert_eq!(request.wait().unwrap(), 40);
/// ```
pub struct Request<P, T> {
    inner: Arc<RequestFuture<P, T>>,
}

impl<P, T> Request<P, T>
where
    P: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Register `payload` with `handler`.
    pub fn new(handler: &Arc<RequestHandler<P, T>>, payload: P) -> Self {
        let id = handler.register_request(payload);
        Self {
            inner: Arc::new(RequestFuture {
                handler: Arc::clone(handler),
                id,
                state: Mutex::new(State::Unresolved),
            }),
        }
    }

    pub fn id(&self) -> RequestId {
        self.inner.id
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Wait using the handler's default timeout; expiry is
    /// [`Error::Timeout`].
    pub fn wait(&self) -> Result<T> {
        self.inner.wait_timeout(self.inner.handler.default_timeout())
    }

    pub fn wait_timeout(&self, timeout: Timeout) -> Result<T> {
        self.inner.wait_timeout(timeout)
    }

    /// Cancel the request; see [`RequestFuture::unregister`].
    pub fn unregister(&self) {
        self.inner.unregister()
    }

    /// View as a generic [`Future`]. The entry lives until the last handle
    /// drops.
    pub fn into_future(self) -> Future<T> {
        Future::from_arc(self.inner)
    }
}

impl<P, T> fmt::Debug for Request<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}
