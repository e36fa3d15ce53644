//! Event caches: where early lifecycle calls wait for a delegate.
//!
//! ## Contents
//! - [`ReceiverCache`] bounded FIFO of [`ReceiverEvent`](crate::ReceiverEvent)s for single-event channels
//! - [`ServiceCache`] one independent slot per service phase (created / started / destroyed)
//! - [`ServiceCall`] a cached service call, as replayed on flush
//!
//! Caches are plain data holders: no locking, no logging, no telemetry. The owning relay
//! serializes access and reports what happened.

mod receiver;
mod service;

pub use receiver::ReceiverCache;
pub use service::{ServiceCache, ServiceCall};
