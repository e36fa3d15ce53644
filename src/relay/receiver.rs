//! # Receiver relay: single-event channels (boot, alarm, watchdog).
//!
//! The front door the OS calls into for one broadcast-style channel. Each incoming event is
//! either forwarded to the attached delegate or parked in a [`ReceiverCache`] until one
//! attaches.
//!
//! ## State machine
//! ```text
//!                 on_event(ev) → cache.store(ev)
//!                 ┌──────────┐
//!                 ▼          │
//!            ┌───────────┐   │      attach(d): flush cache → d, in arrival order
//!   init ──► │ NoHandler │ ──┴──────────────────────────────────────┐
//!            └───────────┘                                          ▼
//!                 ▲                                        ┌─────────────────┐
//!                 │ detach() / last Arc<delegate> dropped  │ HandlerAttached │ ◄─┐
//!                 └─────────────────────────────────────── └─────────────────┘   │
//!                                                            │ on_event(ev) → d.on_receive(ev)
//!                                                            │ attach(d2)   → replace
//!                                                            └────────────────┘
//! ```
//!
//! ## Rules
//! - The forward-or-cache decision, the cache mutation and the delegate call all happen under
//!   one lock per relay: an event racing with `attach` is either flushed or forwarded live,
//!   never both and never neither.
//! - The cache is non-empty only while no live delegate is attached.
//! - No operation blocks beyond acquiring that lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};

use tracing::{debug, info, warn};

use crate::cache::ReceiverCache;
use crate::channel::{Channel, Slot};
use crate::events::{Bus, Event, EventKind};
use crate::payload::{HostContext, Intent, ReceiverEvent};
use crate::relay::{Delivery, ReceiverDelegate, ReceiverDelegateRef};

struct State {
    delegate: Option<Weak<dyn ReceiverDelegate>>,
    cache: ReceiverCache,
}

impl State {
    /// Upgrades the delegate reference; a dead reference is cleared.
    fn live_delegate(&mut self, channel: Channel) -> Option<ReceiverDelegateRef> {
        let weak = self.delegate.as_ref()?;
        match weak.upgrade() {
            Some(d) => Some(d),
            None => {
                debug!(channel = %channel, "delegate dropped; falling back to caching");
                self.delegate = None;
                None
            }
        }
    }
}

/// Deferred-delegation relay for one single-event channel.
pub struct ReceiverRelay {
    channel: Channel,
    state: Mutex<State>,
    bus: Bus,
}

impl ReceiverRelay {
    /// Creates a relay with no delegate and an empty cache holding up to `pending_capacity`
    /// events (minimum 1).
    pub fn new(channel: Channel, pending_capacity: usize, bus: Bus) -> Self {
        Self {
            channel,
            state: Mutex::new(State {
                delegate: None,
                cache: ReceiverCache::new(pending_capacity),
            }),
            bus,
        }
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub(crate) fn bus(&self) -> &Bus {
        &self.bus
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Entry point for the OS component: stamps and handles one broadcast.
    ///
    /// Same locking rules as [`on_event`](Self::on_event).
    pub fn receive(&self, context: HostContext, intent: Intent) -> Delivery {
        self.on_event(ReceiverEvent::new(self.channel, context, intent))
    }

    /// Forwards `ev` to the attached delegate, or caches it if there is none.
    ///
    /// # Deadlocks
    /// The delegate runs under this relay's lock: it must not call back into this relay
    /// (including formatting it with `{:?}` or querying [`pending`](Self::pending)).
    pub fn on_event(&self, ev: ReceiverEvent) -> Delivery {
        let mut state = self.lock();
        debug!(channel = %self.channel, seq = ev.seq, "lifecycle event received");

        if let Some(delegate) = state.live_delegate(self.channel) {
            delegate.on_receive(&ev);
            self.publish(EventKind::Forwarded, ev.seq);
            return Delivery::Forwarded;
        }

        warn!(channel = %self.channel, seq = ev.seq, "delegate not attached; caching event");
        let seq = ev.seq;
        if let Some(evicted) = state.cache.store(ev) {
            warn!(
                channel = %self.channel,
                evicted = evicted.seq,
                latest = seq,
                "pending event overwritten before a delegate attached"
            );
            self.bus.publish(
                self.event(EventKind::Overwritten, evicted.seq)
                    .with_reason(format!("replaced by seq={seq}")),
            );
        }
        self.publish(EventKind::Cached, seq);
        Delivery::Cached
    }

    /// Attaches `delegate`, replacing any previous one, and flushes cached events to it in
    /// arrival order. Returns the number of flushed events.
    ///
    /// Only a weak reference is kept: the caller owns the delegate's lifetime.
    ///
    /// Events are taken from the cache one at a time and the delegate is recorded only once the
    /// flush completes. If the delegate panics, the event in flight is lost, the later ones stay
    /// cached and the relay keeps its previous delegate state.
    ///
    /// # Deadlocks
    /// The flush runs under this relay's lock: the delegate must not call back into this relay.
    pub fn attach(&self, delegate: &ReceiverDelegateRef) -> usize {
        let mut state = self.lock();

        let mut flushed = 0;
        while let Some(ev) = state.cache.take_oldest() {
            delegate.on_receive(&ev);
            self.publish(EventKind::Flushed, ev.seq);
            flushed += 1;
        }
        state.delegate = Some(Arc::downgrade(delegate));

        if flushed > 0 {
            info!(
                channel = %self.channel,
                delegate = delegate.name(),
                flushed,
                "delegate attached; delivered cached events"
            );
        } else {
            debug!(channel = %self.channel, delegate = delegate.name(), "delegate attached");
        }
        self.bus.publish(
            Event::new(EventKind::DelegateAttached)
                .with_channel(self.channel)
                .with_reason(format!("flushed={flushed}")),
        );
        flushed
    }

    /// Clears the delegate reference. Returns `true` if a live delegate was attached.
    pub fn detach(&self) -> bool {
        let mut state = self.lock();
        let was_live = state
            .delegate
            .take()
            .is_some_and(|weak| weak.strong_count() > 0);
        if was_live {
            debug!(channel = %self.channel, "delegate detached");
            self.bus
                .publish(Event::new(EventKind::DelegateDetached).with_channel(self.channel));
        }
        was_live
    }

    /// True if a live delegate is attached.
    pub fn has_delegate(&self) -> bool {
        self.lock()
            .delegate
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Number of cached, undelivered events.
    pub fn pending(&self) -> usize {
        self.lock().cache.len()
    }

    fn event(&self, kind: EventKind, arrival: u64) -> Event {
        Event::new(kind)
            .with_channel(self.channel)
            .with_slot(Slot::Received)
            .with_arrival(arrival)
    }

    fn publish(&self, kind: EventKind, arrival: u64) {
        self.bus.publish(self.event(kind, arrival));
    }
}

impl std::fmt::Debug for ReceiverRelay {
    /// Never blocks: while the relay is busy delivering, only the channel is shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("ReceiverRelay");
        out.field("channel", &self.channel);
        let state = match self.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return out.finish_non_exhaustive(),
        };
        let has_delegate = state
            .delegate
            .as_ref()
            .is_some_and(|weak| weak.strong_count() > 0);
        out.field("pending", &state.cache.len())
            .field("has_delegate", &has_delegate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::AssertUnwindSafe;
    use std::sync::{Arc, Barrier};

    use super::*;
    use crate::relay::testing::{Faulty, Recorder, event};

    fn relay(capacity: usize) -> ReceiverRelay {
        ReceiverRelay::new(Channel::Boot, capacity, Bus::new(64))
    }

    #[test]
    fn cached_event_flushes_once_on_attach() {
        let relay = relay(1);
        assert_eq!(relay.on_event(event(Channel::Boot, "e1")), Delivery::Cached);
        assert_eq!(relay.pending(), 1);

        let (rec, d) = Recorder::arc();
        assert_eq!(relay.attach(&d), 1);
        assert_eq!(rec.tags(), ["e1"]);
        assert_eq!(relay.pending(), 0);

        // Re-attaching must not replay anything.
        assert_eq!(relay.attach(&d), 0);
        assert_eq!(rec.count(), 1);
    }

    #[test]
    fn latest_event_wins_with_single_slot() {
        let relay = relay(1);
        relay.on_event(event(Channel::Boot, "e1"));
        relay.on_event(event(Channel::Boot, "e2"));
        assert_eq!(relay.pending(), 1);

        let (rec, d) = Recorder::arc();
        relay.attach(&d);
        assert_eq!(rec.tags(), ["e2"]);
    }

    #[test]
    fn larger_capacity_flushes_in_arrival_order() {
        let relay = relay(3);
        for tag in ["e1", "e2", "e3", "e4"] {
            relay.on_event(event(Channel::Boot, tag));
        }
        let (rec, d) = Recorder::arc();
        assert_eq!(relay.attach(&d), 3);
        assert_eq!(rec.tags(), ["e2", "e3", "e4"]);
        let seqs = rec.seqs();
        assert!(seqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn live_events_bypass_the_cache() {
        let relay = relay(1);
        let (rec, d) = Recorder::arc();
        relay.attach(&d);

        for tag in ["a", "b", "c"] {
            assert_eq!(relay.on_event(event(Channel::Boot, tag)), Delivery::Forwarded);
            assert_eq!(relay.pending(), 0);
        }
        assert_eq!(rec.tags(), ["a", "b", "c"]);
    }

    #[test]
    fn second_attach_takes_over() {
        let relay = relay(1);
        let (first, d1) = Recorder::arc();
        let (second, d2) = Recorder::arc();
        relay.attach(&d1);
        relay.attach(&d2);

        relay.on_event(event(Channel::Boot, "x"));
        assert_eq!(first.count(), 0);
        assert_eq!(second.tags(), ["x"]);
    }

    #[test]
    fn dropped_delegate_means_caching_again() {
        let relay = relay(1);
        {
            let (_rec, d) = Recorder::arc();
            relay.attach(&d);
            assert!(relay.has_delegate());
        }
        assert!(!relay.has_delegate());
        assert_eq!(relay.on_event(event(Channel::Boot, "late")), Delivery::Cached);

        let (rec, d) = Recorder::arc();
        assert_eq!(relay.attach(&d), 1);
        assert_eq!(rec.tags(), ["late"]);
    }

    #[test]
    fn detach_reports_liveness() {
        let relay = relay(1);
        assert!(!relay.detach());
        let (_rec, d) = Recorder::arc();
        relay.attach(&d);
        assert!(relay.detach());
        assert_eq!(relay.on_event(event(Channel::Boot, "e")), Delivery::Cached);
    }

    #[test]
    fn panicking_flush_keeps_later_events() {
        let relay = relay(3);
        for tag in ["e1", "e2", "e3"] {
            relay.on_event(event(Channel::Boot, tag));
        }

        let faulty = Faulty::receiver();
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| relay.attach(&faulty)));
        assert!(outcome.is_err());
        assert_eq!(relay.pending(), 2);
        assert!(!relay.has_delegate());

        let (rec, d) = Recorder::arc();
        assert_eq!(relay.attach(&d), 2);
        assert_eq!(rec.tags(), ["e2", "e3"]);
    }

    #[test]
    fn debug_does_not_block_while_delivering() {
        let relay = relay(1);
        relay.on_event(event(Channel::Boot, "e1"));
        assert!(format!("{relay:?}").contains("pending: 1"));

        let _busy = relay.lock();
        let rendered = format!("{relay:?}");
        assert!(rendered.contains("Boot"));
        assert!(!rendered.contains("pending"));
    }

    #[tokio::test]
    async fn overwrite_is_published() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let relay = ReceiverRelay::new(Channel::Alarm, 1, bus);
        let first = event(Channel::Alarm, "e1");
        let first_seq = first.seq;
        relay.on_event(first);
        relay.on_event(event(Channel::Alarm, "e2"));

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::Overwritten {
                assert_eq!(ev.arrival, Some(first_seq));
                assert_eq!(ev.channel, Some(Channel::Alarm));
            }
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            [EventKind::Cached, EventKind::Overwritten, EventKind::Cached]
        );
    }

    #[test]
    fn racing_attach_never_loses_or_duplicates() {
        for _ in 0..50 {
            let relay = Arc::new(ReceiverRelay::new(Channel::Watchdog, 1024, Bus::new(1)));
            let (rec, d) = Recorder::arc();
            let barrier = Barrier::new(2);

            std::thread::scope(|s| {
                s.spawn(|| {
                    barrier.wait();
                    for i in 0..100 {
                        relay.on_event(event(Channel::Watchdog, &i.to_string()));
                    }
                });
                s.spawn(|| {
                    barrier.wait();
                    relay.attach(&d);
                });
            });

            assert_eq!(relay.pending(), 0);
            let seqs = rec.seqs();
            assert_eq!(seqs.len(), 100);
            assert!(seqs.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
