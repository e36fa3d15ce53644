//! # Service start payload.
//!
//! [`StartRequest`] is the ancillary data of the `started` slot: the start intent plus the
//! two integer fields the OS passes alongside it. [`StartResult`] is the answer the service
//! hands back to the OS.

use crate::payload::Intent;

/// Arguments of one `onStartCommand` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartRequest {
    /// Start intent; the OS may pass none when restarting a sticky service.
    pub intent: Option<Intent>,
    /// Delivery flags.
    pub flags: i32,
    /// Identifier of this start request.
    pub start_id: i32,
}

impl StartRequest {
    pub fn new(intent: Option<Intent>, flags: i32, start_id: i32) -> Self {
        Self {
            intent,
            flags,
            start_id,
        }
    }
}

/// How the OS should treat the service if its process is killed after a start.
///
/// Discriminants match the platform constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum StartResult {
    /// Keep the service started but do not keep the intent.
    StickyCompatibility = 0,
    /// Restart the service with a null intent.
    Sticky = 1,
    /// Do not restart.
    NotSticky = 2,
    /// Restart and redeliver the last start intent (default answer while no delegate is attached).
    #[default]
    RedeliverIntent = 3,
}

impl StartResult {
    /// Raw platform value.
    #[inline]
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StartResult::StickyCompatibility => "start_sticky_compatibility",
            StartResult::Sticky => "start_sticky",
            StartResult::NotSticky => "start_not_sticky",
            StartResult::RedeliverIntent => "start_redeliver_intent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_asks_for_redelivery() {
        assert_eq!(StartResult::default(), StartResult::RedeliverIntent);
        assert_eq!(StartResult::default().as_raw(), 3);
        assert_eq!(StartResult::NotSticky.as_label(), "start_not_sticky");
    }
}
