//! # Relay configuration.
//!
//! [`RelayConfig`] centralizes the knobs shared by every relay in a
//! [`RelayContext`](crate::RelayContext): how many early events a receiver channel keeps,
//! what the destroy phase does while no delegate is attached, what `onStartCommand`
//! answers before initialization, and how large the telemetry bus is.
//!
//! ## Sentinel values
//! - `pending_capacity = 0` → treated as 1 (a channel always keeps its latest event)
//! - `bus_capacity = 0` → treated as 1
//!
//! # Example
//! ```
//! use lifecycle_relay::{DestroyPolicy, RelayConfig, StartResult};
//!
//! let mut cfg = RelayConfig::default();
//! cfg.pending_capacity = 4;
//! cfg.task_chain_destroy_policy = DestroyPolicy::ResetCache;
//!
//! assert_eq!(cfg.pending_capacity_clamped(), 4);
//! assert_eq!(cfg.start_fallback, StartResult::RedeliverIntent);
//! ```

use crate::payload::StartResult;
use crate::policies::DestroyPolicy;

/// Configuration shared by all relays of a context.
///
/// ## Field semantics
/// - `pending_capacity`: early events kept per receiver channel; the oldest is evicted when full
/// - `destroy_policy`: destroy-phase behavior of the alarm runner service
/// - `task_chain_destroy_policy`: destroy-phase behavior of the task chain runner service
/// - `start_fallback`: answer to `onStartCommand` while no delegate is attached
/// - `bus_capacity`: telemetry ring buffer size
#[derive(Clone, Debug)]
pub struct RelayConfig {
    /// Maximum number of undelivered events a receiver channel holds.
    ///
    /// With the default of 1 a later event replaces an earlier one (latest wins).
    pub pending_capacity: usize,

    /// Destroy-phase policy for [`Channel::AlarmRunner`](crate::Channel::AlarmRunner).
    pub destroy_policy: DestroyPolicy,

    /// Destroy-phase policy for [`Channel::TaskChainRunner`](crate::Channel::TaskChainRunner).
    pub task_chain_destroy_policy: DestroyPolicy,

    /// Result returned to the OS for start requests cached before initialization.
    pub start_fallback: StartResult,

    /// Capacity of the telemetry bus broadcast channel.
    pub bus_capacity: usize,
}

impl RelayConfig {
    /// Returns the receiver cache capacity clamped to a minimum of 1.
    #[inline]
    pub fn pending_capacity_clamped(&self) -> usize {
        self.pending_capacity.max(1)
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for RelayConfig {
    /// Default configuration:
    ///
    /// - `pending_capacity = 1` (latest event wins)
    /// - `destroy_policy = DestroyPolicy::CacheAndFlush`
    /// - `task_chain_destroy_policy = DestroyPolicy::CacheAndFlush`
    /// - `start_fallback = StartResult::RedeliverIntent`
    /// - `bus_capacity = 256`
    fn default() -> Self {
        Self {
            pending_capacity: 1,
            destroy_policy: DestroyPolicy::default(),
            task_chain_destroy_policy: DestroyPolicy::default(),
            start_fallback: StartResult::RedeliverIntent,
            bus_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sentinels_are_clamped() {
        let cfg = RelayConfig {
            pending_capacity: 0,
            bus_capacity: 0,
            ..RelayConfig::default()
        };
        assert_eq!(cfg.pending_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn defaults_are_symmetric_across_services() {
        let cfg = RelayConfig::default();
        assert_eq!(cfg.destroy_policy, cfg.task_chain_destroy_policy);
        assert_eq!(cfg.destroy_policy, DestroyPolicy::CacheAndFlush);
    }
}
