//! Last-request-wins bookkeeping.
//!
//! Every request carries the [`Ticket`] it was issued with. When its result
//! comes back the owner asks [`RequestSequence::is_current`]; anything issued
//! before the newest ticket is stale and gets dropped on arrival. The network
//! transfer itself is never aborted.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct RequestSequence {
    next: u64,
    current: Option<Ticket>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh ticket; all earlier ones become stale.
    pub fn issue(&mut self) -> Ticket {
        self.next += 1;
        let ticket = Ticket(self.next);
        self.current = Some(ticket);
        ticket
    }

    /// Make every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.current == Some(ticket)
    }
}
