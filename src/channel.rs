//! # Lifecycle channels and slots.
//!
//! A [`Channel`] names one kind of OS lifecycle callback. Each channel has exactly one
//! relay per [`RelayContext`](crate::RelayContext).
//!
//! ```text
//! single-event channels:  Boot, Alarm, Watchdog           slot: Received
//! service channels:       AlarmRunner, TaskChainRunner    slots: Created → Started* → Destroyed
//! ```

use std::fmt;

/// Identifies a lifecycle channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Device finished booting.
    Boot,
    /// A scheduled alarm fired.
    Alarm,
    /// The periodic watchdog alarm fired.
    Watchdog,
    /// Service that executes work triggered by alarms.
    AlarmRunner,
    /// Service that executes chains of event-driven tasks.
    TaskChainRunner,
}

impl Channel {
    /// All channels, single-event channels first.
    pub const ALL: [Channel; 5] = [
        Channel::Boot,
        Channel::Alarm,
        Channel::Watchdog,
        Channel::AlarmRunner,
        Channel::TaskChainRunner,
    ];

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Channel::Boot => "boot",
            Channel::Alarm => "alarm",
            Channel::Watchdog => "watchdog",
            Channel::AlarmRunner => "alarm_runner",
            Channel::TaskChainRunner => "task_chain_runner",
        }
    }

    /// True for channels driven by a multi-phase service lifecycle.
    #[inline]
    pub fn is_service(&self) -> bool {
        matches!(self, Channel::AlarmRunner | Channel::TaskChainRunner)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A named lifecycle phase with its own cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    /// The single slot of a receiver channel.
    Received,
    /// Service `onCreate`.
    Created,
    /// Service `onStartCommand`.
    Started,
    /// Service `onDestroy`.
    Destroyed,
}

impl Slot {
    /// Flush order for service slots.
    pub const SERVICE_ORDER: [Slot; 3] = [Slot::Created, Slot::Started, Slot::Destroyed];

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Slot::Received => "received",
            Slot::Created => "created",
            Slot::Started => "started",
            Slot::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_channels() {
        let services: Vec<_> = Channel::ALL.iter().filter(|c| c.is_service()).collect();
        assert_eq!(services, [&Channel::AlarmRunner, &Channel::TaskChainRunner]);
    }

    #[test]
    fn slot_order_follows_lifecycle() {
        let mut sorted = Slot::SERVICE_ORDER;
        sorted.sort();
        assert_eq!(sorted, Slot::SERVICE_ORDER);
        assert_eq!(Slot::Started.to_string(), "started");
    }
}
