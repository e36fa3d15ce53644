//! # Intent payload.
//!
//! An [`Intent`] is the raw payload the OS attaches to a broadcast or a service start:
//! an optional action string and a set of string extras. It is immutable once built.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Action broadcast by the OS once the device has finished booting.
pub const ACTION_BOOT_COMPLETED: &str = "android.intent.action.BOOT_COMPLETED";

/// Action + extras payload.
///
/// ## Example
/// ```rust
/// use lifecycle_relay::Intent;
///
/// let intent = Intent::new()
///     .with_action("es.uji.geotec.taskdispatcher.ALARM")
///     .with_extra("task", "collect-location");
///
/// assert!(intent.has_action("ES.UJI.GEOTEC.TASKDISPATCHER.ALARM"));
/// assert_eq!(intent.extra("task"), Some("collect-location"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intent {
    action: Option<Arc<str>>,
    extras: BTreeMap<String, String>,
}

impl Intent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for an intent carrying only an action.
    #[must_use]
    pub fn action(action: impl Into<Arc<str>>) -> Self {
        Self::new().with_action(action)
    }

    #[inline]
    #[must_use]
    pub fn with_action(mut self, action: impl Into<Arc<str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Returns the action, if any.
    #[inline]
    pub fn get_action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// ASCII case-insensitive action comparison. An intent without action never matches.
    pub fn has_action(&self, action: &str) -> bool {
        self.action
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case(action))
    }

    #[inline]
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// Iterates extras in key order.
    pub fn extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.extras.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
