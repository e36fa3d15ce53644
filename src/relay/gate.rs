//! # Event-source boundary screening.
//!
//! [`ReceiverGate`] sits between the raw OS callback and a [`ReceiverRelay`]. It drops calls
//! that must never reach the relay:
//! - no host context (`DispatchError::MissingContext`)
//! - an intent whose action does not match the channel's required action
//!   (`DispatchError::UnexpectedAction`)
//!
//! A rejected dispatch is a no-op for the relay: nothing is cached and nothing is forwarded.
//!
//! ```text
//! OS callback(context?, intent) ──► gate.dispatch ──┬─ Err(DispatchError)  (relay untouched)
//!                                                   └─ Ok(relay.receive(context, intent))
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::channel::Channel;
use crate::error::DispatchError;
use crate::events::{Event, EventKind};
use crate::payload::{ACTION_BOOT_COMPLETED, HostContext, Intent};
use crate::relay::{Delivery, ReceiverRelay};

/// Validating front door of a receiver relay.
#[derive(Clone, Debug)]
pub struct ReceiverGate {
    relay: Arc<ReceiverRelay>,
    required_action: Option<&'static str>,
}

impl ReceiverGate {
    /// Gate with the channel's default filter: the boot channel only accepts
    /// [`ACTION_BOOT_COMPLETED`], other channels accept any action.
    pub fn new(relay: Arc<ReceiverRelay>) -> Self {
        let required_action = match relay.channel() {
            Channel::Boot => Some(ACTION_BOOT_COMPLETED),
            _ => None,
        };
        Self {
            relay,
            required_action,
        }
    }

    /// Overrides the action this gate lets through.
    #[must_use]
    pub fn requiring_action(mut self, action: &'static str) -> Self {
        self.required_action = Some(action);
        self
    }

    #[inline]
    pub fn relay(&self) -> &Arc<ReceiverRelay> {
        &self.relay
    }

    /// Screens one raw callback and hands it to the relay if it passes.
    pub fn dispatch(
        &self,
        context: Option<HostContext>,
        intent: Intent,
    ) -> Result<Delivery, DispatchError> {
        let screened = match context {
            Some(context) => self.check_action(&intent).map(|()| context),
            None => Err(DispatchError::MissingContext),
        };
        match screened {
            Ok(context) => Ok(self.relay.receive(context, intent)),
            Err(err) => {
                let channel = self.relay.channel();
                debug!(channel = %channel, reason = err.as_label(), "callback rejected");
                self.relay.bus().publish(
                    Event::new(EventKind::DispatchRejected)
                        .with_channel(channel)
                        .with_reason(err.as_message()),
                );
                Err(err)
            }
        }
    }

    fn check_action(&self, intent: &Intent) -> Result<(), DispatchError> {
        match self.required_action {
            Some(expected) if !intent.has_action(expected) => {
                Err(DispatchError::UnexpectedAction {
                    expected,
                    got: intent.get_action().map(str::to_owned),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Bus;

    fn gate(channel: Channel) -> ReceiverGate {
        ReceiverGate::new(Arc::new(ReceiverRelay::new(channel, 1, Bus::new(8))))
    }

    #[test]
    fn missing_context_never_reaches_relay() {
        let gate = gate(Channel::Alarm);
        let err = gate.dispatch(None, Intent::new()).unwrap_err();
        assert_eq!(err, DispatchError::MissingContext);
        assert_eq!(gate.relay().pending(), 0);
    }

    #[test]
    fn boot_gate_requires_boot_action() {
        let gate = gate(Channel::Boot);
        let ctx = HostContext::new("receiver", ());

        let err = gate
            .dispatch(Some(ctx.clone()), Intent::action("android.intent.action.SCREEN_ON"))
            .unwrap_err();
        assert_eq!(err.as_label(), "dispatch_unexpected_action");
        assert_eq!(gate.relay().pending(), 0);

        let delivery = gate
            .dispatch(Some(ctx), Intent::action("android.intent.action.boot_completed"))
            .unwrap();
        assert_eq!(delivery, Delivery::Cached);
        assert_eq!(gate.relay().pending(), 1);
    }

    #[test]
    fn custom_action_filter() {
        let gate = gate(Channel::Watchdog).requiring_action("watchdog.TICK");
        let ctx = HostContext::new("receiver", ());
        assert!(gate.dispatch(Some(ctx.clone()), Intent::new()).is_err());
        assert!(gate.dispatch(Some(ctx), Intent::action("watchdog.tick")).is_ok());
    }

    #[tokio::test]
    async fn rejection_is_published() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let gate = ReceiverGate::new(Arc::new(ReceiverRelay::new(Channel::Boot, 1, bus)));
        let _ = gate.dispatch(None, Intent::action(ACTION_BOOT_COMPLETED));

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::DispatchRejected);
        assert_eq!(ev.channel, Some(Channel::Boot));
    }
}
