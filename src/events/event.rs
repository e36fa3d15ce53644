//! # Telemetry events emitted by relays.
//!
//! The [`EventKind`] enum classifies what happened to a lifecycle call:
//! - **Delivery events**: cached, forwarded live, flushed on attach
//! - **Loss events**: overwritten by a later event, discarded by a cache reset, rejected at the boundary
//! - **Delegate events**: attached, detached
//! - **Subscriber events**: overflow, panic
//!
//! The [`Event`] struct carries the channel, slot, reason and the arrival sequence of the
//! lifecycle call it describes.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use lifecycle_relay::{Channel, Event, EventKind, Slot};
//!
//! let ev = Event::new(EventKind::Cached)
//!     .with_channel(Channel::Boot)
//!     .with_slot(Slot::Received)
//!     .with_reason("no delegate");
//!
//! assert_eq!(ev.kind, EventKind::Cached);
//! assert_eq!(ev.channel, Some(Channel::Boot));
//! assert_eq!(ev.reason.as_deref(), Some("no delegate"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::channel::{Channel, Slot};

/// Global sequence counter for telemetry ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of relay telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Delivery ===
    /// Call arrived with no delegate attached and was stored.
    ///
    /// Sets: `channel`, `slot`, `arrival` (receiver channels)
    Cached,

    /// Call was forwarded synchronously to the attached delegate.
    ///
    /// Sets: `channel`, `slot`, `arrival` (receiver channels)
    Forwarded,

    /// Cached call was delivered to a newly attached delegate.
    ///
    /// Sets: `channel`, `slot`, `arrival` (receiver channels)
    Flushed,

    // === Loss ===
    /// A cached call was evicted by a later one before any delegate attached.
    ///
    /// Sets: `channel`, `slot`, `arrival` (of the evicted event), `reason`
    Overwritten,

    /// Pending service slots were discarded by [`DestroyPolicy::ResetCache`](crate::DestroyPolicy::ResetCache).
    ///
    /// Sets: `channel`, `slot` (`Destroyed`), `reason` (discarded slots)
    CacheReset,

    /// A raw callback was rejected at the event-source boundary.
    ///
    /// Sets: `channel`, `reason` (error label)
    DispatchRejected,

    // === Delegate ===
    /// A delegate was attached (or replaced).
    ///
    /// Sets: `channel`, `reason` (number of flushed calls)
    DelegateAttached,

    /// A delegate reference was cleared.
    ///
    /// Sets: `channel`
    DelegateDetached,

    // === Subscribers ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `subscriber`, `reason`
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `subscriber`, `reason`
    SubscriberOverflow,
}

impl EventKind {
    /// Returns a short stable label (kebab-case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::Cached => "cached",
            EventKind::Forwarded => "forwarded",
            EventKind::Flushed => "flushed",
            EventKind::Overwritten => "overwritten",
            EventKind::CacheReset => "cache-reset",
            EventKind::DispatchRejected => "dispatch-rejected",
            EventKind::DelegateAttached => "delegate-attached",
            EventKind::DelegateDetached => "delegate-detached",
            EventKind::SubscriberPanicked => "subscriber-panicked",
            EventKind::SubscriberOverflow => "subscriber-overflow",
        }
    }
}

/// Telemetry event with optional metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Channel the call belongs to.
    pub channel: Option<Channel>,
    /// Lifecycle slot of the call.
    pub slot: Option<Slot>,
    /// Arrival sequence of the receiver event this telemetry describes.
    pub arrival: Option<u64>,
    /// Human-readable reason (rejections, overflow details, flush counts).
    pub reason: Option<Arc<str>>,
    /// Name of the subscriber, for subscriber events.
    pub subscriber: Option<&'static str>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            channel: None,
            slot: None,
            arrival: None,
            reason: None,
            subscriber: None,
        }
    }

    #[inline]
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    #[inline]
    pub fn with_slot(mut self, slot: Slot) -> Self {
        self.slot = Some(slot);
        self
    }

    #[inline]
    pub fn with_arrival(mut self, seq: u64) -> Self {
        self.arrival = Some(seq);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        let mut ev = Event::new(EventKind::SubscriberOverflow)
            .with_reason(format!("subscriber={subscriber} reason={reason}"));
        ev.subscriber = Some(subscriber);
        ev
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        let mut ev = Event::new(EventKind::SubscriberPanicked).with_reason(info);
        ev.subscriber = Some(subscriber);
        ev
    }

    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_is_monotonic() {
        let a = Event::new(EventKind::Cached);
        let b = Event::new(EventKind::Forwarded);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn subscriber_helpers_fill_name() {
        let ev = Event::subscriber_overflow("audit", "full");
        assert!(ev.is_subscriber_event());
        assert_eq!(ev.subscriber, Some("audit"));
        assert_eq!(ev.reason.as_deref(), Some("subscriber=audit reason=full"));
        assert!(ev.channel.is_none());
    }
}
