//! Relay policies.
//!
//! This module groups the knobs that control **what happens to early calls** that cannot
//! be delivered yet.
//!
//! ## Contents
//! - [`DestroyPolicy`] what a service relay does with `onDestroy` while no delegate is attached
//!
//! ## Defaults
//! - `DestroyPolicy::CacheAndFlush` for every service channel.

mod destroy;

pub use destroy::DestroyPolicy;
