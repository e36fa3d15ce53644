//! Error types used at the event-source boundary.
//!
//! Relay operations themselves never fail: a missing delegate is a normal state,
//! not an error. The only fallible surface is [`ReceiverGate`](crate::ReceiverGate),
//! which screens raw calls from the OS component before they reach a relay.
//!
//! [`DispatchError`] provides helper methods (`as_label`, `as_message`) for logs/metrics,
//! in the same shape as the telemetry reasons published on the [`Bus`](crate::Bus).

use thiserror::Error;

/// # Errors produced while screening a raw OS callback.
///
/// A rejected dispatch is a no-op for the relay: nothing is cached, nothing is forwarded.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// The OS handed over no component context.
    #[error("callback arrived without a host context")]
    MissingContext,

    /// The intent action does not match the action this channel listens for.
    #[error("unexpected intent action {got:?}; expected {expected:?}")]
    UnexpectedAction {
        /// Action the channel requires.
        expected: &'static str,
        /// Action carried by the intent (if any).
        got: Option<String>,
    },
}

impl DispatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lifecycle_relay::DispatchError;
    ///
    /// assert_eq!(DispatchError::MissingContext.as_label(), "dispatch_missing_context");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            DispatchError::MissingContext => "dispatch_missing_context",
            DispatchError::UnexpectedAction { .. } => "dispatch_unexpected_action",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DispatchError::MissingContext => "no host context".to_string(),
            DispatchError::UnexpectedAction { expected, got } => match got {
                Some(got) => format!("action={got} expected={expected}"),
                None => format!("action=<none> expected={expected}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let err = DispatchError::UnexpectedAction {
            expected: "boot",
            got: Some("other".into()),
        };
        assert_eq!(err.as_label(), "dispatch_unexpected_action");
        assert_eq!(err.as_message(), "action=other expected=boot");
    }

    #[test]
    fn message_without_action() {
        let err = DispatchError::UnexpectedAction {
            expected: "boot",
            got: None,
        };
        assert_eq!(err.as_message(), "action=<none> expected=boot");
        assert!(err.to_string().contains("None"));
    }
}
