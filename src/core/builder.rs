use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{context::RelayContext, listener};
use crate::{
    config::RelayConfig,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`RelayContext`] with optional telemetry subscribers.
pub struct RelayContextBuilder {
    cfg: RelayConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RelayContextBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: RelayConfig) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets telemetry subscribers.
    ///
    /// Subscribers receive relay telemetry through dedicated workers with bounded queues.
    /// They require a tokio runtime at [`build`](Self::build) time.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds one telemetry subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the context: bus, one relay per channel, and (if subscribers were given and a
    /// runtime is available) the telemetry listener.
    ///
    /// Relays never need a runtime; without one, subscribers are skipped with a warning.
    pub fn build(self) -> Arc<RelayContext> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let token = CancellationToken::new();

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let _guard = handle.enter();
                    let set = SubscriberSet::new(self.subscribers, bus.clone());
                    Some(listener::spawn(&bus, set, token.clone()))
                }
                Err(_) => {
                    warn!(
                        subscribers = self.subscribers.len(),
                        "no tokio runtime; telemetry subscribers disabled"
                    );
                    None
                }
            }
        };

        Arc::new(RelayContext::new_internal(self.cfg, bus, token, listener))
    }
}
