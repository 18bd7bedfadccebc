//! Request/future correlation table.
//!
//! A consumer thread registers an operation and gets back a [`RequestId`]
//! (or a [`Request`] handle owning one). A producer thread later resolves the
//! id with [`RequestHandler::serve_request`], waking everyone blocked in
//! [`RequestHandler::wait_request`].
//!
//! ```text
//!  consumer                    RequestHandler                   producer
//!  ────────                    ──────────────                   ────────
//!  register_request(p) ──────▶ #1 Pending(p)
//!                              pending_requests() ◀───────────── poll
//!  wait_request(#1) ── blocks                      ◀──────────── serve_request(#1, r)
//!                  ◀────────── #1 Resolved(r)
//!  release_request(#1) ──────▶ (id free again)
//! ```
//!
//! Per-id state machine: `Pending → Resolved` or `Pending → Unregistered`.
//! Both outcomes are terminal. An entry stays in the table, answering waits,
//! until it is released.

mod handler;
mod request;

pub use handler::RequestHandler;
pub use request::{Request, RequestFuture};

use std::fmt;

/// Identifier of a live entry in a [`RequestHandler`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u32);

impl RequestId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}
