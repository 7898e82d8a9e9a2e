//! Reply correlation.
//!
//! Replies carry the address they answer as their first argument. The
//! client issues a single request (the announce), so at most one reply is
//! ever outstanding.

use nsm_core::address;
use nsm_osc::Message;

/// Where an inbound message should go.
#[derive(Debug, PartialEq)]
pub enum Routed {
    /// Answers the outstanding request.
    Correlated(Message),
    /// A coordinator command for the dispatcher.
    Command(Message),
    /// A reply nobody is waiting for.
    Dropped,
}

#[derive(Debug, Default)]
pub struct ReplyCorrelator {
    pending: Option<String>,
}

impl ReplyCorrelator {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Start waiting for a reply to `request`.
    pub fn expect(&mut self, request: impl Into<String>) {
        self.pending = Some(request.into());
    }

    /// Request currently awaiting a reply.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Route an inbound message.
    ///
    /// Any `/reply` received while a request is outstanding is handed to the
    /// requester, which validates the echoed address itself. `/error` is only
    /// correlated when it echoes the pending address, since coordinators send
    /// errors for other reasons too.
    pub fn route(&mut self, msg: Message) -> Routed {
        let is_error = match msg.address.as_str() {
            address::REPLY => false,
            address::ERROR => true,
            _ => return Routed::Command(msg),
        };
        let echoed = msg.string(0).ok();

        let Some(pending) = self.pending.as_deref() else {
            tracing::debug!(address = %msg.address, ?echoed, "Dropping unexpected reply");
            return Routed::Dropped;
        };
        if is_error && echoed != Some(pending) {
            tracing::debug!(?echoed, pending, "Dropping error for another request");
            return Routed::Dropped;
        }
        self.pending = None;
        Routed::Correlated(msg)
    }
}
