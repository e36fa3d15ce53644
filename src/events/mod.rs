//! Relay telemetry: types and broadcast bus.
//!
//! This module groups the telemetry **data model** and the **bus** used to
//! publish/subscribe to what relays do with incoming lifecycle calls.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `ReceiverRelay`, `ServiceRelay`, `ReceiverGate`,
//!   `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the context listener (fans out to `SubscriberSet`).
//!
//! Telemetry is observational only: publishing never blocks and never influences delivery.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
