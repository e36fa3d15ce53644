//! # Service cache
//!
//! Keeps one independent slot per service phase. A slot is "early-called" exactly when it
//! holds a value, so flag and payload can never disagree; the destroyed phase has no payload
//! and is a plain flag.
//!
//! ## Internal scheme
//! ```text
//! created:   Option<HostContext>    store → Some(ctx)          take → None
//! started:   Option<StartRequest>   store → Some(req)          take → None
//! destroyed: bool                   store → true               take → false
//!
//! take_next() → Create, then StartCommand, then Destroy   (earliest filled slot first)
//! ```

use crate::channel::Slot;
use crate::payload::{HostContext, StartRequest};

/// A cached service call, ready to be replayed.
#[derive(Debug, Clone)]
pub enum ServiceCall {
    /// Early `onCreate`.
    Create(HostContext),
    /// Early `onStartCommand`.
    StartCommand(StartRequest),
    /// Early `onDestroy`.
    Destroy,
}

impl ServiceCall {
    /// Slot this call was cached in.
    pub fn slot(&self) -> Slot {
        match self {
            ServiceCall::Create(_) => Slot::Created,
            ServiceCall::StartCommand(_) => Slot::Started,
            ServiceCall::Destroy => Slot::Destroyed,
        }
    }
}

/// Per-phase cache of a service channel.
#[derive(Debug, Default)]
pub struct ServiceCache {
    created: Option<HostContext>,
    started: Option<StartRequest>,
    destroyed: bool,
}

impl ServiceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an early `onCreate`, returning the context it replaced.
    pub fn store_created(&mut self, ctx: HostContext) -> Option<HostContext> {
        self.created.replace(ctx)
    }

    /// Records an early `onStartCommand`, returning the request it replaced.
    pub fn store_started(&mut self, req: StartRequest) -> Option<StartRequest> {
        self.started.replace(req)
    }

    /// Records an early `onDestroy`. Returns `true` if it was already recorded.
    pub fn store_destroyed(&mut self) -> bool {
        std::mem::replace(&mut self.destroyed, true)
    }

    pub fn take_created(&mut self) -> Option<HostContext> {
        self.created.take()
    }

    pub fn take_started(&mut self) -> Option<StartRequest> {
        self.started.take()
    }

    pub fn take_destroyed(&mut self) -> bool {
        std::mem::take(&mut self.destroyed)
    }

    /// Removes the earliest filled slot in lifecycle order.
    ///
    /// A replay that unwinds mid-way leaves every later slot in place.
    pub fn take_next(&mut self) -> Option<ServiceCall> {
        if let Some(ctx) = self.take_created() {
            return Some(ServiceCall::Create(ctx));
        }
        if let Some(req) = self.take_started() {
            return Some(ServiceCall::StartCommand(req));
        }
        self.take_destroyed().then_some(ServiceCall::Destroy)
    }

    /// Discards every slot, returning which ones held a value.
    pub fn reset(&mut self) -> Vec<Slot> {
        let discarded = self.pending_slots();
        *self = Self::default();
        discarded
    }

    /// Slots currently holding an early call, in lifecycle order.
    #[must_use]
    pub fn pending_slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        if self.created.is_some() {
            slots.push(Slot::Created);
        }
        if self.started.is_some() {
            slots.push(Slot::Started);
        }
        if self.destroyed {
            slots.push(Slot::Destroyed);
        }
        slots
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_none() && self.started.is_none() && !self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Intent;

    #[test]
    fn slots_are_independent() {
        let mut cache = ServiceCache::new();
        cache.store_created(HostContext::new("svc", ()));
        cache.store_started(StartRequest::new(None, 0, 1));

        assert!(cache.take_created().is_some());
        assert_eq!(cache.pending_slots(), [Slot::Started]);
        assert!(!cache.is_empty());
    }

    #[test]
    fn take_next_follows_lifecycle_order() {
        let mut cache = ServiceCache::new();
        cache.store_destroyed();
        cache.store_started(StartRequest::new(Some(Intent::action("run")), 0, 1));
        cache.store_created(HostContext::new("svc", ()));

        let mut slots = Vec::new();
        while let Some(call) = cache.take_next() {
            slots.push(call.slot());
            assert_eq!(cache.pending_slots().len(), 3 - slots.len());
        }
        assert_eq!(slots, Slot::SERVICE_ORDER);
        assert!(cache.is_empty());
    }

    #[test]
    fn later_start_replaces_earlier() {
        let mut cache = ServiceCache::new();
        assert!(cache.store_started(StartRequest::new(None, 0, 1)).is_none());
        let replaced = cache.store_started(StartRequest::new(None, 0, 2));
        assert_eq!(replaced.map(|r| r.start_id), Some(1));
        assert_eq!(cache.take_started().map(|r| r.start_id), Some(2));
    }

    #[test]
    fn reset_reports_discarded_slots() {
        let mut cache = ServiceCache::new();
        cache.store_created(HostContext::new("svc", ()));
        assert!(!cache.store_destroyed());
        assert!(cache.store_destroyed());
        assert_eq!(cache.reset(), [Slot::Created, Slot::Destroyed]);
        assert!(cache.is_empty());
    }
}
