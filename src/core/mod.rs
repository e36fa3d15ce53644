//! Process-wide relay context: construction and wiring.
//!
//! The only public API from this module is [`RelayContext`] (plus its builder and the
//! [`Delegates`] bundle). One context replaces the per-channel global statics an OS
//! integration would otherwise need: it is built once at process start, shared as an `Arc`,
//! and handed to every OS-facing component.
//!
//! Internal modules:
//! - [`context`]: owns one relay per channel and the telemetry listener;
//! - [`builder`]: config + subscribers → context;
//! - [`listener`]: forwards bus telemetry to the subscriber set.

mod builder;
mod context;
mod listener;

pub use builder::RelayContextBuilder;
pub use context::{Delegates, RelayContext};
