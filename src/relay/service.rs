//! # Service relay: multi-phase service lifecycle.
//!
//! Models `created → started (0..n) → destroyed`. Each phase is gated independently: while no
//! delegate is attached the call lands in its own [`ServiceCache`] slot; on attach the slots
//! are replayed in lifecycle order regardless of which ones are filled.
//!
//! ## Flow
//! ```text
//! on_create(ctx)       ── delegate? ──► d.on_create(ctx)
//!                                 └──► cache.created = ctx
//! on_start_command(r)  ── delegate? ──► d.on_start_command(r) ──► result to OS
//!                                 └──► cache.started = r      ──► start_fallback to OS
//! on_destroy()         ── delegate? ──► d.on_destroy()
//!                                 └──► CacheAndFlush: cache.destroyed = true
//!                                      ResetCache:    cache.reset()
//!
//! attach(d): created → started → destroyed, each replayed once then cleared
//! ```
//!
//! The start fallback (default [`StartResult::RedeliverIntent`]) asks the OS to redeliver the
//! start intent later; it is not a failure.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError, Weak};

use tracing::{debug, info, warn};

use crate::cache::{ServiceCache, ServiceCall};
use crate::channel::{Channel, Slot};
use crate::events::{Bus, Event, EventKind};
use crate::payload::{HostContext, StartRequest, StartResult};
use crate::policies::DestroyPolicy;
use crate::relay::{Delivery, ServiceDelegate, ServiceDelegateRef};

struct State {
    delegate: Option<Weak<dyn ServiceDelegate>>,
    cache: ServiceCache,
}

impl State {
    fn live_delegate(&mut self, channel: Channel) -> Option<ServiceDelegateRef> {
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

/// Deferred-delegation relay for one service channel.
pub struct ServiceRelay {
    channel: Channel,
    destroy_policy: DestroyPolicy,
    start_fallback: StartResult,
    state: Mutex<State>,
    bus: Bus,
}

impl ServiceRelay {
    /// Creates a relay with no delegate, [`DestroyPolicy::CacheAndFlush`] and a
    /// [`StartResult::RedeliverIntent`] fallback.
    pub fn new(channel: Channel, bus: Bus) -> Self {
        Self {
            channel,
            destroy_policy: DestroyPolicy::default(),
            start_fallback: StartResult::default(),
            state: Mutex::new(State {
                delegate: None,
                cache: ServiceCache::new(),
            }),
            bus,
        }
    }

    #[must_use]
    pub fn with_destroy_policy(mut self, policy: DestroyPolicy) -> Self {
        self.destroy_policy = policy;
        self
    }

    #[must_use]
    pub fn with_start_fallback(mut self, fallback: StartResult) -> Self {
        self.start_fallback = fallback;
        self
    }

    #[inline]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    #[inline]
    pub fn destroy_policy(&self) -> DestroyPolicy {
        self.destroy_policy
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Service `onCreate`.
    ///
    /// # Deadlocks
    /// The delegate runs under this relay's lock: it must not call back into this relay
    /// (including formatting it with `{:?}` or querying [`pending_slots`](Self::pending_slots)).
    pub fn on_create(&self, host: HostContext) -> Delivery {
        let mut state = self.lock();
        debug!(channel = %self.channel, host = host.label(), "onCreate called");

        if let Some(delegate) = state.live_delegate(self.channel) {
            delegate.on_create(&host);
            self.publish(EventKind::Forwarded, Slot::Created);
            return Delivery::Forwarded;
        }

        warn!(channel = %self.channel, "service delegate not attached; caching onCreate");
        if state.cache.store_created(host).is_some() {
            self.publish_overwrite(Slot::Created);
        }
        self.publish(EventKind::Cached, Slot::Created);
        Delivery::Cached
    }

    /// Service `onStartCommand`. Returns the delegate's answer, or the configured fallback when
    /// the request had to be cached.
    ///
    /// # Deadlocks
    /// The delegate runs under this relay's lock: it must not call back into this relay
    /// (including formatting it with `{:?}` or querying [`pending_slots`](Self::pending_slots)).
    pub fn on_start_command(&self, request: StartRequest) -> StartResult {
        let mut state = self.lock();
        debug!(
            channel = %self.channel,
            flags = request.flags,
            start_id = request.start_id,
            "onStartCommand called"
        );

        if let Some(delegate) = state.live_delegate(self.channel) {
            let result = delegate.on_start_command(&request);
            self.publish(EventKind::Forwarded, Slot::Started);
            return result;
        }

        warn!(
            channel = %self.channel,
            start_id = request.start_id,
            fallback = self.start_fallback.as_label(),
            "service delegate not attached; caching onStartCommand"
        );
        if state.cache.store_started(request).is_some() {
            self.publish_overwrite(Slot::Started);
        }
        self.publish(EventKind::Cached, Slot::Started);
        self.start_fallback
    }

    /// Service `onDestroy`.
    ///
    /// # Deadlocks
    /// The delegate runs under this relay's lock: it must not call back into this relay
    /// (including formatting it with `{:?}` or querying [`pending_slots`](Self::pending_slots)).
    pub fn on_destroy(&self) -> Delivery {
        let mut state = self.lock();
        debug!(channel = %self.channel, "onDestroy called");

        if let Some(delegate) = state.live_delegate(self.channel) {
            delegate.on_destroy();
            self.publish(EventKind::Forwarded, Slot::Destroyed);
            return Delivery::Forwarded;
        }

        match self.destroy_policy {
            DestroyPolicy::CacheAndFlush => {
                warn!(channel = %self.channel, "service delegate not attached; caching onDestroy");
                state.cache.store_destroyed();
                self.publish(EventKind::Cached, Slot::Destroyed);
                Delivery::Cached
            }
            DestroyPolicy::ResetCache => {
                let discarded = state.cache.reset();
                warn!(
                    channel = %self.channel,
                    discarded = ?discarded,
                    policy = self.destroy_policy.as_label(),
                    "service delegate not attached; discarding early lifecycle"
                );
                let labels: Vec<&str> = discarded.iter().map(Slot::as_label).collect();
                self.bus.publish(
                    Event::new(EventKind::CacheReset)
                        .with_channel(self.channel)
                        .with_slot(Slot::Destroyed)
                        .with_reason(format!("discarded=[{}]", labels.join(","))),
                );
                Delivery::Discarded
            }
        }
    }

    /// Attaches `delegate`, replacing any previous one, and replays cached phases in the
    /// order created → started → destroyed. Returns the number of replayed calls.
    ///
    /// Results of replayed start requests are dropped: the OS already received the fallback.
    ///
    /// Slots are taken one at a time and the delegate is recorded only once the replay
    /// completes. If the delegate panics, the call in flight is lost, the later slots stay
    /// cached and the relay keeps its previous delegate state.
    ///
    /// # Deadlocks
    /// The replay runs under this relay's lock: the delegate must not call back into this relay.
    pub fn attach(&self, delegate: &ServiceDelegateRef) -> usize {
        let mut state = self.lock();

        let mut flushed = 0;
        while let Some(call) = state.cache.take_next() {
            let slot = call.slot();
            match call {
                ServiceCall::Create(host) => delegate.on_create(&host),
                ServiceCall::StartCommand(request) => {
                    let result = delegate.on_start_command(&request);
                    debug!(
                        channel = %self.channel,
                        start_id = request.start_id,
                        result = result.as_label(),
                        "replayed onStartCommand; result not forwarded"
                    );
                }
                ServiceCall::Destroy => delegate.on_destroy(),
            }
            self.publish(EventKind::Flushed, slot);
            flushed += 1;
        }
        state.delegate = Some(Arc::downgrade(delegate));

        if flushed > 0 {
            info!(
                channel = %self.channel,
                delegate = delegate.name(),
                flushed,
                "service delegate attached; replayed early lifecycle"
            );
        } else {
            debug!(channel = %self.channel, delegate = delegate.name(), "service delegate attached");
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
            debug!(channel = %self.channel, "service delegate detached");
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

    /// Slots currently holding an early call, in lifecycle order.
    pub fn pending_slots(&self) -> Vec<Slot> {
        self.lock().cache.pending_slots()
    }

    fn publish(&self, kind: EventKind, slot: Slot) {
        self.bus
            .publish(Event::new(kind).with_channel(self.channel).with_slot(slot));
    }

    fn publish_overwrite(&self, slot: Slot) {
        warn!(channel = %self.channel, slot = %slot, "pending call overwritten before a delegate attached");
        self.bus.publish(
            Event::new(EventKind::Overwritten)
                .with_channel(self.channel)
                .with_slot(slot)
                .with_reason("replaced by a later call"),
        );
    }
}

impl std::fmt::Debug for ServiceRelay {
    /// Never blocks: while the relay is busy delivering, pending slots are not shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("ServiceRelay");
        out.field("channel", &self.channel)
            .field("destroy_policy", &self.destroy_policy);
        let state = match self.state.try_lock() {
            Ok(state) => state,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return out.finish_non_exhaustive(),
        };
        out.field("pending", &state.cache.pending_slots()).finish()
    }
}
