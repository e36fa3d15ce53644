//! Delegation relays: the per-channel front doors the OS calls into.
//!
//! ## Contents
//! - [`ReceiverRelay`] single-event channels (boot, alarm, watchdog)
//! - [`ServiceRelay`] multi-phase service channels (alarm runner, task chain runner)
//! - [`ReceiverGate`] boundary screening before a receiver relay
//! - [`ReceiverDelegate`], [`ServiceDelegate`], [`ReceiverFn`] delegate capability sets
//!
//! ## Quick wiring
//! ```text
//! OS ──► relay.on_*(..) ──┬─ delegate attached ──► delegate.on_*(..)   (same call stack)
//!                         └─ no delegate       ──► cache slot
//! app init ──► relay.attach(&delegate) ──► flush cache ──► delegate
//! ```

mod delegate;
mod gate;
mod receiver;
mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use delegate::{
    ReceiverDelegate, ReceiverDelegateRef, ReceiverFn, ServiceDelegate, ServiceDelegateRef,
};
pub use gate::ReceiverGate;
pub use receiver::ReceiverRelay;
pub use service::ServiceRelay;

/// What a relay did with an incoming lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the attached delegate synchronously.
    Forwarded,
    /// Stored until a delegate attaches.
    Cached,
    /// Dropped together with the pending early lifecycle ([`DestroyPolicy::ResetCache`](crate::DestroyPolicy::ResetCache)).
    Discarded,
}

