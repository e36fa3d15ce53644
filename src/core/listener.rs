//! # Telemetry listener.
//!
//! Subscribes to the [`Bus`] and forwards every event to the [`SubscriberSet`] until the
//! context's token is cancelled. On cancellation it drains what is already buffered, then
//! closes the subscriber queues and waits for their workers.
//!
//! ```text
//! Bus.subscribe() ──► loop {
//!                        token cancelled ─► drain buffered ─► set.shutdown() ─► exit
//!                        Ok(ev)          ─► set.emit_arc(ev)
//!                        Lagged(n)       ─► warn, continue
//!                        Closed          ─► set.shutdown() ─► exit
//!                     }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::events::Bus;
use crate::subscribers::SubscriberSet;

/// Spawns the listener on the current runtime.
pub(super) fn spawn(bus: &Bus, set: SubscriberSet, token: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    while let Ok(ev) = rx.try_recv() {
                        set.emit_arc(Arc::new(ev));
                    }
                    break;
                }
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit_arc(Arc::new(ev)),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "telemetry listener lagged; events skipped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        }
        set.shutdown().await;
    })
}
