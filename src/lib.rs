//! # lifecycle-relay
//!
//! **lifecycle-relay** defers OS lifecycle callbacks until the application code that handles
//! them is ready.
//!
//! The OS may invoke boot, alarm, watchdog and service callbacks before the application's
//! runtime has finished initializing. Each callback lands on a relay: if a delegate is
//! attached the call is forwarded on the same call stack, otherwise it is cached and replayed
//! when the delegate attaches.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   OS component layer (receivers, services)
//!        │ receive / on_create / on_start_command / on_destroy
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  RelayContext                                                     │
//! │  - ReceiverRelay × 3  (boot, alarm, watchdog)  + ReceiverCache    │
//! │  - ServiceRelay  × 2  (alarm_runner, task_chain_runner)           │
//! │                                               + ServiceCache      │
//! │  - ReceiverGate       (boundary screening, per receiver channel)  │
//! └──────┬──────────────────────────────────────────────┬─────────────┘
//!        │ forward (delegate attached)                  │ publishes telemetry:
//!        ▼                                              │ Cached, Forwarded, Flushed,
//!   ReceiverDelegate / ServiceDelegate                  │ Overwritten, CacheReset, ...
//!   (attached late via attach / wire_up)                ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                    Bus (broadcast channel)                        │
//! │               (capacity: RelayConfig::bus_capacity)               │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                          ┌─────────────────┐
//!                          │    listener     │
//!                          └────────┬────────┘
//!                                   ▼
//!                            SubscriberSet (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      worker1   worker2   workerN
//! ```
//!
//! ### Lifecycle of one channel
//! ```text
//! NoHandler ── event ──► cache (latest wins, or bounded FIFO)
//!     │
//!     └─ attach(d) ──► flush cache → d (arrival order; service: created → started → destroyed)
//!                      │
//!                      ▼
//! HandlerAttached ── event ──► d (synchronously)
//!     │
//!     └─ detach() / delegate dropped ──► NoHandler
//! ```
//!
//! ## Features
//! | Area              | Description                                                         | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------------|---------------------------------------------|
//! | **Relays**        | Forward-or-cache front doors for every lifecycle channel.           | [`ReceiverRelay`], [`ServiceRelay`]         |
//! | **Delegates**     | Application handlers, attached late and held weakly.                | [`ReceiverDelegate`], [`ServiceDelegate`]   |
//! | **Caches**        | Where early calls wait.                                             | [`ReceiverCache`], [`ServiceCache`]         |
//! | **Context**       | Explicitly constructed owner of all relays.                         | [`RelayContext`], [`Delegates`]             |
//! | **Subscriber API**| Hook into relay telemetry (logging, metrics, custom subscribers).   | [`Subscribe`]                               |
//! | **Errors**        | Typed errors at the OS boundary.                                    | [`DispatchError`], [`ReceiverGate`]         |
//! | **Configuration** | Cache capacity, destroy policies, start fallback.                   | [`RelayConfig`], [`DestroyPolicy`]          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use lifecycle_relay::{
//!     Channel, Delegates, HostContext, Intent, ReceiverDelegateRef, ReceiverEvent, ReceiverFn,
//!     RelayConfig, RelayContext, StartRequest, StartResult, ACTION_BOOT_COMPLETED,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn lifecycle_relay::Subscribe>> = {
//!         use lifecycle_relay::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn lifecycle_relay::Subscribe>> = Vec::new();
//!
//!     let ctx = RelayContext::builder(RelayConfig::default())
//!         .with_subscribers(subs)
//!         .build();
//!
//!     // The OS fires before the application is ready.
//!     let gate = ctx.gate(Channel::Boot).ok_or("boot is a receiver channel")?;
//!     gate.dispatch(
//!         Some(HostContext::new("boot-receiver", ())),
//!         Intent::action(ACTION_BOOT_COMPLETED),
//!     )?;
//!     let answer = ctx.alarm_runner().on_start_command(StartRequest::new(None, 0, 1));
//!     assert_eq!(answer, StartResult::RedeliverIntent);
//!
//!     // Application bootstrap attaches its delegates; cached calls are flushed.
//!     let on_boot: ReceiverDelegateRef = ReceiverFn::arc("reschedule", |ev: &ReceiverEvent| {
//!         println!("boot event #{}", ev.seq);
//!     });
//!     let delegates = Delegates::default().with_boot(on_boot);
//!     assert_eq!(ctx.wire_up(&delegates), 1);
//!     assert_eq!(ctx.pending_channels(), [Channel::AlarmRunner]);
//!
//!     ctx.shutdown().await;
//!     Ok(())
//! }
//! ```
mod cache;
mod channel;
mod config;
mod core;
mod error;
mod events;
mod payload;
mod policies;
mod relay;
mod subscribers;

// ---- Public re-exports ----

pub use cache::{ReceiverCache, ServiceCache, ServiceCall};
pub use channel::{Channel, Slot};
pub use config::RelayConfig;
pub use core::{Delegates, RelayContext, RelayContextBuilder};
pub use error::DispatchError;
pub use events::{Bus, Event, EventKind};
pub use payload::{
    ACTION_BOOT_COMPLETED, HostContext, Intent, ReceiverEvent, StartRequest, StartResult,
};
pub use policies::DestroyPolicy;
pub use relay::{
    Delivery, ReceiverDelegate, ReceiverDelegateRef, ReceiverFn, ReceiverGate, ReceiverRelay,
    ServiceDelegate, ServiceDelegateRef, ServiceRelay,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
