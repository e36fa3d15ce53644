//! # Telemetry subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out used by
//! [`RelayContext`](crate::RelayContext) to deliver relay telemetry from the
//! [`Bus`](crate::Bus) to user code.
//!
//! ## Architecture
//! ```text
//! relays ── publish(Event) ──► Bus ──► context listener ──► SubscriberSet
//!                                                               │
//!                                                ┌──────────────┼──────────────┐
//!                                                ▼              ▼              ▼
//!                                            LogWriter       Metrics        Custom
//! ```
//!
//! Subscribers observe; they cannot influence delivery. A slow or panicking subscriber only
//! loses its own events.
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use lifecycle_relay::{Subscribe, Event, EventKind};
//! use async_trait::async_trait;
//!
//! struct LossCounter;
//!
//! #[async_trait]
//! impl Subscribe for LossCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if matches!(event.kind, EventKind::Overwritten | EventKind::CacheReset) {
//!             // increment a loss counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "loss-counter" }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
