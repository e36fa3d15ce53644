//! # Single-event channel delivery.
//!
//! [`ReceiverEvent`] is what a boot/alarm/watchdog delegate receives: the host context and
//! intent handed over by the OS, stamped with the channel and an arrival sequence number.
//!
//! ## Ordering guarantees
//! `seq` comes from a process-wide counter that increases monotonically per constructed
//! event, so a flushed event can always be told apart from (and ordered before) any event
//! that arrived after it.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::channel::Channel;
use crate::payload::{HostContext, Intent};

/// Global arrival counter for receiver events.
static ARRIVAL_SEQ: AtomicU64 = AtomicU64::new(0);

/// One delivery on a single-event channel. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct ReceiverEvent {
    /// Monotonic arrival sequence number.
    pub seq: u64,
    /// Wall-clock arrival time.
    pub at: SystemTime,
    /// Channel the event arrived on.
    pub channel: Channel,
    /// Host component that received the broadcast.
    pub context: HostContext,
    /// Broadcast payload.
    pub intent: Intent,
}

impl ReceiverEvent {
    /// Stamps a new arrival on `channel`.
    pub fn new(channel: Channel, context: HostContext, intent: Intent) -> Self {
        Self {
            seq: ARRIVAL_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            channel,
            context,
            intent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_increases() {
        let ctx = HostContext::new("t", ());
        let a = ReceiverEvent::new(Channel::Boot, ctx.clone(), Intent::new());
        let b = ReceiverEvent::new(Channel::Boot, ctx, Intent::new());
        assert!(b.seq > a.seq);
    }
}
