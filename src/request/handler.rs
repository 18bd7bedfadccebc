//! The id → slot table.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use super::{Request, RequestId};
use crate::config::RequestConfig;
use crate::error::{Error, Result};
use crate::monitor::Monitor;
use crate::wait::{lock, Timeout};

#[derive(Clone)]
enum SlotState<R> {
    Pending,
    Resolved(R),
    Unregistered,
}

impl<R> SlotState<R> {
    fn is_pending(&self) -> bool {
        matches!(self, SlotState::Pending)
    }
}

struct Slot<P, R> {
    state: Monitor<SlotState<R>>,
    payload: Mutex<Option<P>>,
}

/// Thread-safe table correlating registered requests with their results.
///
/// `P` is the context the registering thread hands to the producer, `R` the
/// result the producer hands back. Waiting clones `R`, so any number of
/// waits on a resolved id return the same value.
///
/// Lock order: the table lock may be held while taking a slot lock, never
/// the other way around.
pub struct RequestHandler<P, R> {
    table: Mutex<HashMap<RequestId, Arc<Slot<P, R>>>>,
    next_id: AtomicU32,
    default_timeout: Timeout,
}

impl<P, R> RequestHandler<P, R> {
    /// Create an empty table whose `Request` handles wait indefinitely.
    pub fn new() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
            next_id: AtomicU32::new(1),
            default_timeout: Timeout::INFINITE,
        }
    }

    /// Create an empty table using `config` for its defaults.
    pub fn with_config(config: &RequestConfig) -> Self {
        Self {
            default_timeout: config.default_timeout,
            ..Self::new()
        }
    }

    /// Timeout used by [`Request::wait`].
    pub fn default_timeout(&self) -> Timeout {
        self.default_timeout
    }

    /// Register a pending request carrying `payload` and return its id.
    ///
    /// Ids increase monotonically and wrap around, skipping 0 and ids that
    /// are still live.
    pub fn register_request(&self, payload: P) -> RequestId {
        let mut table = lock(&self.table);
        let id = loop {
            let candidate = RequestId(self.next_id.fetch_add(1, Ordering::Relaxed));
            if candidate.0 != 0 && !table.contains_key(&candidate) {
                break candidate;
            }
        };

        table.insert(
            id,
            Arc::new(Slot {
                state: Monitor::new(SlotState::Pending),
                payload: Mutex::new(Some(payload)),
            }),
        );
        tracing::trace!(request = %id, live = table.len(), "request registered");
        id
    }

    /// Resolve a pending request and wake its waiters.
    ///
    /// Serving an unregistered request is a no-op that discards `result`.
    /// Serving twice is a protocol violation: it asserts in debug builds and
    /// returns [`Error::AlreadyServed`] otherwise.
    pub fn serve_request(&self, id: RequestId, result: R) -> Result<()> {
        let slot = self.slot(id).inspect_err(|_| {
            tracing::warn!(request = %id, "serve for unknown request");
        })?;

        slot.state.update(|state| match state {
            SlotState::Pending => {
                *state = SlotState::Resolved(result);
                tracing::trace!(request = %id, "request served");
                Ok(())
            }
            SlotState::Unregistered => {
                tracing::debug!(request = %id, "discarding result of unregistered request");
                Ok(())
            }
            SlotState::Resolved(_) => {
                debug_assert!(false, "request {} served twice", id);
                Err(Error::AlreadyServed(id))
            }
        })
    }

    /// Block until `id` is resolved or `timeout` elapses, returning a copy of
    /// the result.
    pub fn wait_request(&self, id: RequestId, timeout: Timeout) -> Result<R>
    where
        R: Clone,
    {
        let slot = self.slot(id)?;
        match slot
            .state
            .wait_until_timeout(|state| !state.is_pending(), timeout)
        {
            Some(SlotState::Resolved(result)) => Ok(result),
            Some(SlotState::Unregistered) => Err(Error::Unregistered(id)),
            _ => Err(Error::Timeout {
                duration_ms: timeout.as_millis(),
            }),
        }
    }

    /// Block until `id` leaves the pending state, without copying the
    /// result. Returns at once for unknown ids.
    pub(crate) fn wait_until_settled(&self, id: RequestId) {
        if let Ok(slot) = self.slot(id) {
            slot.state
                .wait_with(|state| !state.is_pending(), Timeout::INFINITE, |_| ());
        }
    }

    /// Non-blocking: has `id` been served? False for unknown ids.
    pub fn is_request_ready(&self, id: RequestId) -> bool {
        self.slot(id)
            .map(|slot| slot.state.with(|state| matches!(state, SlotState::Resolved(_))))
            .unwrap_or(false)
    }

    /// Cancel a pending request. Current and future waits on `id` fail with
    /// [`Error::Unregistered`]; a later `serve_request` is discarded.
    ///
    /// Returns false, changing nothing, if `id` is unknown or already
    /// resolved.
    pub fn unregister_request(&self, id: RequestId) -> bool {
        let Ok(slot) = self.slot(id) else {
            return false;
        };
        let cancelled = slot.state.update(|state| {
            if state.is_pending() {
                *state = SlotState::Unregistered;
                true
            } else {
                false
            }
        });
        if cancelled {
            lock(&slot.payload).take();
            tracing::debug!(request = %id, "request unregistered");
        }
        cancelled
    }

    /// Remove `id` from the table, freeing it for reuse.
    ///
    /// A still pending entry is unregistered first so its waiters fail
    /// instead of hanging. Returns false if `id` was unknown.
    pub fn release_request(&self, id: RequestId) -> bool {
        let removed = lock(&self.table).remove(&id);
        match removed {
            Some(slot) => {
                slot.state.update(|state| {
                    if state.is_pending() {
                        *state = SlotState::Unregistered;
                    }
                });
                true
            }
            None => false,
        }
    }

    /// Take the payload of `id` out of the table (producer side).
    pub fn take_payload(&self, id: RequestId) -> Option<P> {
        self.slot(id).ok().and_then(|slot| lock(&slot.payload).take())
    }

    /// Copy of the payload of `id`, if still present.
    pub fn payload(&self, id: RequestId) -> Option<P>
    where
        P: Clone,
    {
        self.slot(id).ok().and_then(|slot| lock(&slot.payload).clone())
    }

    /// Ids still waiting to be served, in ascending order.
    pub fn pending_requests(&self) -> Vec<RequestId> {
        let table = lock(&self.table);
        let mut ids: Vec<_> = table
            .iter()
            .filter(|(_, slot)| slot.state.with(SlotState::is_pending))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Number of live entries (pending, resolved or unregistered).
    pub fn len(&self) -> usize {
        lock(&self.table).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.table).is_empty()
    }

    fn slot(&self, id: RequestId) -> Result<Arc<Slot<P, R>>> {
        lock(&self.table)
            .get(&id)
            .cloned()
            .ok_or(Error::UnknownRequest(id))
    }
}

impl<R> RequestHandler<(), R> {
    /// Register a request that carries no payload.
    pub fn register(&self) -> RequestId {
        self.register_request(())
    }
}

impl<P> RequestHandler<P, ()> {
    /// Resolve a request whose result is `()`.
    pub fn serve(&self, id: RequestId) -> Result<()> {
        self.serve_request(id, ())
    }
}

impl<P, R> RequestHandler<P, R>
where
    P: Send + 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Register `payload` and wrap the id in an owning [`Request`].
    pub fn request(self: &Arc<Self>, payload: P) -> Request<P, R> {
        Request::new(self, payload)
    }
}

impl<P, R> Default for RequestHandler<P, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R> fmt::Debug for RequestHandler<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("live", &self.len())
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
