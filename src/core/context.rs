//! # RelayContext: one relay per lifecycle channel.
//!
//! The [`RelayContext`] owns the telemetry bus and one relay for every [`Channel`]. It is
//! constructed explicitly at startup and injected into the OS-facing layer, which calls the
//! relays; the application bootstrap later attaches its delegates, individually or as a
//! [`Delegates`] bundle via [`RelayContext::wire_up`].
//!
//! ## Wiring
//! ```text
//! RelayContext::builder(cfg).with_subscribers(subs).build()
//!     ├─ Bus (telemetry)
//!     ├─ boot, alarm, watchdog          ReceiverRelay  (pending_capacity)
//!     ├─ alarm_runner                   ServiceRelay   (destroy_policy, start_fallback)
//!     ├─ task_chain_runner              ServiceRelay   (task_chain_destroy_policy, start_fallback)
//!     └─ listener: Bus ──► SubscriberSet (only with subscribers)
//!
//! OS layer:        ctx.boot().receive(..) / ctx.gate(Channel::Boot)?.dispatch(..)
//!                  ctx.alarm_runner().on_start_command(..)
//! App bootstrap:   ctx.wire_up(&delegates)
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use lifecycle_relay::{
//!     Delegates, HostContext, Intent, ReceiverDelegateRef, ReceiverEvent, ReceiverFn,
//!     RelayConfig, RelayContext, ACTION_BOOT_COMPLETED,
//! };
//!
//! let ctx = RelayContext::new(RelayConfig::default());
//!
//! // The OS delivers boot before the application is ready: the event is cached.
//! ctx.boot().receive(HostContext::new("boot-receiver", ()), Intent::action(ACTION_BOOT_COMPLETED));
//! assert_eq!(ctx.boot().pending(), 1);
//!
//! // The application attaches its delegate; the cached event is flushed to it.
//! let on_boot: ReceiverDelegateRef = ReceiverFn::arc("reschedule", |_ev: &ReceiverEvent| {});
//! let delegates = Delegates::default().with_boot(on_boot);
//! assert_eq!(ctx.wire_up(&delegates), 1);
//! assert!(ctx.pending_channels().is_empty());
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::builder::RelayContextBuilder;
use crate::channel::Channel;
use crate::config::RelayConfig;
use crate::events::{Bus, Event};
use crate::relay::{
    ReceiverDelegateRef, ReceiverGate, ReceiverRelay, ServiceDelegateRef, ServiceRelay,
};

/// A bundle of delegates to attach in one go.
///
/// Relays keep only weak references: keep this bundle (or clones of its `Arc`s) alive for as
/// long as the delegates should stay attached.
#[derive(Clone, Default)]
pub struct Delegates {
    pub boot: Option<ReceiverDelegateRef>,
    pub alarm: Option<ReceiverDelegateRef>,
    pub watchdog: Option<ReceiverDelegateRef>,
    pub alarm_runner: Option<ServiceDelegateRef>,
    pub task_chain_runner: Option<ServiceDelegateRef>,
}

impl Delegates {
    #[must_use]
    pub fn with_boot(mut self, d: ReceiverDelegateRef) -> Self {
        self.boot = Some(d);
        self
    }

    #[must_use]
    pub fn with_alarm(mut self, d: ReceiverDelegateRef) -> Self {
        self.alarm = Some(d);
        self
    }

    #[must_use]
    pub fn with_watchdog(mut self, d: ReceiverDelegateRef) -> Self {
        self.watchdog = Some(d);
        self
    }

    #[must_use]
    pub fn with_alarm_runner(mut self, d: ServiceDelegateRef) -> Self {
        self.alarm_runner = Some(d);
        self
    }

    #[must_use]
    pub fn with_task_chain_runner(mut self, d: ServiceDelegateRef) -> Self {
        self.task_chain_runner = Some(d);
        self
    }
}

/// Process-wide owner of every lifecycle relay.
pub struct RelayContext {
    cfg: RelayConfig,
    bus: Bus,
    boot: Arc<ReceiverRelay>,
    alarm: Arc<ReceiverRelay>,
    watchdog: Arc<ReceiverRelay>,
    alarm_runner: Arc<ServiceRelay>,
    task_chain_runner: Arc<ServiceRelay>,
    token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl RelayContext {
    /// Returns a builder for configuring telemetry subscribers.
    pub fn builder(cfg: RelayConfig) -> RelayContextBuilder {
        RelayContextBuilder::new(cfg)
    }

    /// Builds a context without telemetry subscribers. No runtime required.
    pub fn new(cfg: RelayConfig) -> Arc<Self> {
        RelayContextBuilder::new(cfg).build()
    }

    pub(super) fn new_internal(
        cfg: RelayConfig,
        bus: Bus,
        token: CancellationToken,
        listener: Option<JoinHandle<()>>,
    ) -> Self {
        let capacity = cfg.pending_capacity_clamped();
        let receiver = |channel| Arc::new(ReceiverRelay::new(channel, capacity, bus.clone()));
        let service = |channel, policy| {
            Arc::new(
                ServiceRelay::new(channel, bus.clone())
                    .with_destroy_policy(policy)
                    .with_start_fallback(cfg.start_fallback),
            )
        };

        Self {
            boot: receiver(Channel::Boot),
            alarm: receiver(Channel::Alarm),
            watchdog: receiver(Channel::Watchdog),
            alarm_runner: service(Channel::AlarmRunner, cfg.destroy_policy),
            task_chain_runner: service(Channel::TaskChainRunner, cfg.task_chain_destroy_policy),
            cfg,
            bus,
            token,
            listener: Mutex::new(listener),
        }
    }

    #[inline]
    pub fn config(&self) -> &RelayConfig {
        &self.cfg
    }

    #[inline]
    pub fn boot(&self) -> &Arc<ReceiverRelay> {
        &self.boot
    }

    #[inline]
    pub fn alarm(&self) -> &Arc<ReceiverRelay> {
        &self.alarm
    }

    #[inline]
    pub fn watchdog(&self) -> &Arc<ReceiverRelay> {
        &self.watchdog
    }

    #[inline]
    pub fn alarm_runner(&self) -> &Arc<ServiceRelay> {
        &self.alarm_runner
    }

    #[inline]
    pub fn task_chain_runner(&self) -> &Arc<ServiceRelay> {
        &self.task_chain_runner
    }

    /// Receiver relay of a single-event channel; `None` for service channels.
    pub fn receiver(&self, channel: Channel) -> Option<&Arc<ReceiverRelay>> {
        match channel {
            Channel::Boot => Some(&self.boot),
            Channel::Alarm => Some(&self.alarm),
            Channel::Watchdog => Some(&self.watchdog),
            Channel::AlarmRunner | Channel::TaskChainRunner => None,
        }
    }

    /// Service relay of a service channel; `None` for single-event channels.
    pub fn service(&self, channel: Channel) -> Option<&Arc<ServiceRelay>> {
        match channel {
            Channel::AlarmRunner => Some(&self.alarm_runner),
            Channel::TaskChainRunner => Some(&self.task_chain_runner),
            Channel::Boot | Channel::Alarm | Channel::Watchdog => None,
        }
    }

    /// Boundary gate in front of a receiver relay; `None` for service channels.
    pub fn gate(&self, channel: Channel) -> Option<ReceiverGate> {
        self.receiver(channel).cloned().map(ReceiverGate::new)
    }

    /// Attaches every delegate present in `delegates` and returns the total number of cached
    /// calls flushed to them.
    pub fn wire_up(&self, delegates: &Delegates) -> usize {
        let receivers = [
            (&self.boot, &delegates.boot),
            (&self.alarm, &delegates.alarm),
            (&self.watchdog, &delegates.watchdog),
        ];
        let services = [
            (&self.alarm_runner, &delegates.alarm_runner),
            (&self.task_chain_runner, &delegates.task_chain_runner),
        ];

        let mut flushed = 0;
        for (relay, delegate) in receivers {
            if let Some(d) = delegate {
                flushed += relay.attach(d);
            }
        }
        for (relay, delegate) in services {
            if let Some(d) = delegate {
                flushed += relay.attach(d);
            }
        }
        info!(flushed, "delegates wired up");
        flushed
    }

    /// Channels currently holding cached calls.
    pub fn pending_channels(&self) -> Vec<Channel> {
        Channel::ALL
            .into_iter()
            .filter(|&channel| match channel {
                Channel::Boot | Channel::Alarm | Channel::Watchdog => self
                    .receiver(channel)
                    .is_some_and(|relay| relay.pending() > 0),
                Channel::AlarmRunner | Channel::TaskChainRunner => self
                    .service(channel)
                    .is_some_and(|relay| !relay.pending_slots().is_empty()),
            })
            .collect()
    }

    /// Raw telemetry receiver (independent of configured subscribers).
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Stops the telemetry listener after draining buffered events, and waits for subscriber
    /// workers. Relays keep working; further telemetry just has no subscribers.
    pub async fn shutdown(&self) {
        self.token.cancel();
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl Drop for RelayContext {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::events::EventKind;
    use crate::payload::{HostContext, Intent, StartRequest, StartResult};
    use crate::policies::DestroyPolicy;
    use crate::relay::testing::{Recorder, ServiceRecorder};
    use crate::subscribers::Subscribe;

    #[derive(Default)]
    struct Collect {
        events: Mutex<Vec<(EventKind, Option<Channel>)>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, event: &Event) {
            self.events
                .lock()
                .unwrap()
                .push((event.kind, event.channel));
        }

        fn name(&self) -> &'static str {
            "collect"
        }
    }

    fn host() -> HostContext {
        HostContext::new("host", ())
    }

    #[test]
    fn channel_lookup_matches_shape() {
        let ctx = RelayContext::new(RelayConfig::default());
        for channel in Channel::ALL {
            assert_eq!(ctx.receiver(channel).is_some(), !channel.is_service());
            assert_eq!(ctx.service(channel).is_some(), channel.is_service());
            assert_eq!(ctx.gate(channel).is_some(), !channel.is_service());
        }
    }

    #[test]
    fn wire_up_flushes_every_channel() {
        let ctx = RelayContext::new(RelayConfig::default());
        ctx.boot().receive(host(), Intent::action("boot"));
        ctx.alarm().receive(host(), Intent::action("alarm"));
        ctx.alarm_runner().on_create(host());
        assert_eq!(
            ctx.alarm_runner()
                .on_start_command(StartRequest::new(None, 0, 1)),
            StartResult::RedeliverIntent
        );
        assert_eq!(
            ctx.pending_channels(),
            [Channel::Boot, Channel::Alarm, Channel::AlarmRunner]
        );

        let (boot, boot_d) = Recorder::arc();
        let (alarm, alarm_d) = Recorder::arc();
        let (watchdog, watchdog_d) = Recorder::arc();
        let (runner, runner_d) = ServiceRecorder::arc(StartResult::NotSticky);
        let delegates = Delegates::default()
            .with_boot(boot_d)
            .with_alarm(alarm_d)
            .with_watchdog(watchdog_d)
            .with_alarm_runner(runner_d);

        assert_eq!(ctx.wire_up(&delegates), 4);
        assert!(ctx.pending_channels().is_empty());
        assert_eq!(boot.count(), 1);
        assert_eq!(alarm.count(), 1);
        assert_eq!(watchdog.count(), 0);
        assert_eq!(runner.calls(), ["create:host", "start:-:0:1"]);

        // Task chain runner had no delegate in the bundle: still caching.
        ctx.task_chain_runner().on_destroy();
        assert_eq!(ctx.pending_channels(), [Channel::TaskChainRunner]);
    }

    #[test]
    fn config_reaches_relays() {
        let cfg = RelayConfig {
            pending_capacity: 2,
            task_chain_destroy_policy: DestroyPolicy::ResetCache,
            start_fallback: StartResult::NotSticky,
            ..RelayConfig::default()
        };
        let ctx = RelayContext::new(cfg);
        assert_eq!(
            ctx.task_chain_runner().destroy_policy(),
            DestroyPolicy::ResetCache
        );
        assert_eq!(
            ctx.alarm_runner().destroy_policy(),
            DestroyPolicy::CacheAndFlush
        );
        assert_eq!(
            ctx.task_chain_runner()
                .on_start_command(StartRequest::new(None, 0, 1)),
            StartResult::NotSticky
        );

        for tag in ["a", "b", "c"] {
            ctx.watchdog().receive(host(), Intent::new().with_extra("tag", tag));
        }
        assert_eq!(ctx.watchdog().pending(), 2);
    }

    #[test]
    fn raw_receiver_observes_relays() {
        let ctx = RelayContext::new(RelayConfig::default());
        let mut rx = ctx.subscribe();
        ctx.watchdog().receive(host(), Intent::new());

        let ev = rx.try_recv().unwrap();
        assert_eq!(ev.kind, EventKind::Cached);
        assert_eq!(ev.channel, Some(Channel::Watchdog));
    }

    #[test]
    fn subscribers_without_runtime_are_skipped() {
        let ctx = RelayContext::builder(RelayConfig::default())
            .with_subscriber(Arc::new(Collect::default()))
            .build();
        ctx.boot().receive(host(), Intent::new());
        assert_eq!(ctx.boot().pending(), 1);
    }

    #[tokio::test]
    async fn telemetry_reaches_subscribers() {
        let collect = Arc::new(Collect::default());
        let ctx = RelayContext::builder(RelayConfig::default())
            .with_subscriber(collect.clone())
            .build();

        ctx.alarm().receive(host(), Intent::new());
        let (_rec, d) = Recorder::arc();
        ctx.alarm().attach(&d);
        ctx.shutdown().await;

        let events = collect.events.lock().unwrap().clone();
        assert_eq!(
            events,
            [
                (EventKind::Cached, Some(Channel::Alarm)),
                (EventKind::Flushed, Some(Channel::Alarm)),
                (EventKind::DelegateAttached, Some(Channel::Alarm)),
            ]
        );
    }
}
