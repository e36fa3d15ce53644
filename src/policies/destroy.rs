//! # Destroy-phase policy for service relays.
//!
//! When the OS destroys a service before any delegate is attached, the relay has two options:
//!
//! ```text
//! DestroyPolicy::CacheAndFlush  → mark the destroyed slot; on attach the delegate sees
//!                                 onCreate → onStartCommand → onDestroy
//! DestroyPolicy::ResetCache     → drop every pending slot; the delegate sees nothing
//! ```
//!
//! `CacheAndFlush` keeps the destroyed slot symmetric with created/started and is the default.

/// Policy controlling an early `onDestroy` on a service relay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DestroyPolicy {
    /// Cache the destroy call and replay it after created/started on attach (default).
    #[default]
    CacheAndFlush,
    /// Discard all pending slots; the whole early lifecycle is forgotten.
    ResetCache,
}

impl DestroyPolicy {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DestroyPolicy::CacheAndFlush => "cache_and_flush",
            DestroyPolicy::ResetCache => "reset_cache",
        }
    }
}
