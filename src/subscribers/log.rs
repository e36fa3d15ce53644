//! # LogWriter: tracing-backed telemetry printer
//!
//! A minimal subscriber that renders relay telemetry through `tracing`.
//! Use it for demos or when no richer sink is wired up.
//!
//! ## Example output
//! ```text
//! [cached] channel=boot slot=received arrival=3
//! [overwritten] channel=boot slot=received arrival=3 reason="replaced by seq=4"
//! [delegate-attached] channel=boot reason="flushed=1"
//! [flushed] channel=boot slot=received arrival=4
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Telemetry writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let channel = e.channel.map(|c| c.as_label()).unwrap_or("-");
        let slot = e.slot.map(|s| s.as_label()).unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::Overwritten
            | EventKind::CacheReset
            | EventKind::DispatchRejected
            | EventKind::SubscriberOverflow
            | EventKind::SubscriberPanicked => {
                warn!(
                    "[{}] channel={} slot={} arrival={:?} subscriber={:?} reason={:?}",
                    e.kind.as_label(),
                    channel,
                    slot,
                    e.arrival,
                    e.subscriber,
                    reason
                );
            }
            _ => {
                info!(
                    "[{}] channel={} slot={} arrival={:?} reason={:?}",
                    e.kind.as_label(),
                    channel,
                    slot,
                    e.arrival,
                    reason
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
