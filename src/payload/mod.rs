//! Raw payloads handed over by the OS component layer.
//!
//! ## Contents
//! - [`HostContext`] opaque handle to the component that produced a callback
//! - [`Intent`] action + extras carried by broadcasts and start requests
//! - [`ReceiverEvent`] one single-event channel delivery
//! - [`StartRequest`], [`StartResult`] service start payload and its answer to the OS

mod host;
mod intent;
mod receiver;
mod start;

pub use host::HostContext;
pub use intent::{ACTION_BOOT_COMPLETED, Intent};
pub use receiver::ReceiverEvent;
pub use start::{StartRequest, StartResult};
