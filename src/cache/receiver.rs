//! # Receiver cache
//!
//! Holds the events of a single-event channel that arrived while no delegate was attached.
//!
//! ## Behavior
//! - `store` appends; when `capacity` is reached the **oldest** pending event is evicted and
//!   handed back so the relay can report the loss.
//! - With `capacity = 1` this is last-write-wins: a later event replaces an earlier one.
//! - `take_oldest` hands events back one at a time in arrival order; the buffer is released
//!   once the last one is taken.
//!
//! ```text
//! capacity = 2
//! store(E1)     → [E1]
//! store(E2)     → [E1, E2]
//! store(E3)     → [E2, E3]   evicted: E1
//! take_oldest() → E2, [E3]
//! take_oldest() → E3, []
//! ```

use std::collections::VecDeque;

use crate::payload::ReceiverEvent;

/// Bounded FIFO of undelivered receiver events.
#[derive(Debug)]
pub struct ReceiverCache {
    pending: VecDeque<ReceiverEvent>,
    capacity: usize,
}

impl ReceiverCache {
    /// Creates an empty cache. `capacity` is clamped to a minimum of 1.
    ///
    /// No buffer is allocated until the first event is stored.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Records an event, returning the evicted oldest event if the cache was full.
    pub fn store(&mut self, ev: ReceiverEvent) -> Option<ReceiverEvent> {
        let evicted = if self.pending.len() >= self.capacity {
            self.pending.pop_front()
        } else {
            None
        };
        self.pending.push_back(ev);
        evicted
    }

    /// Removes and returns the oldest pending event.
    pub fn take_oldest(&mut self) -> Option<ReceiverEvent> {
        let ev = self.pending.pop_front();
        if self.pending.is_empty() {
            self.pending = VecDeque::new();
        }
        ev
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
