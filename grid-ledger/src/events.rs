//! Outbound event queue
//!
//! State transitions append events here in call order; the host drains the
//! queue and forwards to whatever sink it wires up (log lines, a channel, a
//! message bus). Emission is fire-and-forget: the core never waits on a
//! consumer and a slow sink cannot block mutation.

use crate::types::LedgerEvent;
use std::collections::VecDeque;

/// FIFO queue of undelivered events
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<LedgerEvent>,
}

impl EventQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event; ordering is call order
    pub fn emit(&mut self, event: LedgerEvent) {
        tracing::debug!(?event, "ledger event");
        self.queue.push_back(event);
    }

    /// Take all pending events, oldest first
    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        self.queue.drain(..).collect()
    }

    /// Undelivered event count
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether any events are pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
