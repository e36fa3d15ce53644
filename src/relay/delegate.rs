//! # Delegate capability sets.
//!
//! A delegate is the application-side handler a relay forwards to. There is one trait per
//! channel shape:
//! - [`ReceiverDelegate`] for single-event channels (boot, alarm, watchdog)
//! - [`ServiceDelegate`] for multi-phase service channels (alarm runner, task chain runner)
//!
//! Relays hold delegates **weakly**: the application owns the `Arc`, and dropping its last
//! strong reference is an implicit detach.
//!
//! ## Rules
//! - Calls arrive synchronously on the thread that called into the relay.
//! - A delegate must not call back into the relay that is invoking it (the relay lock is held
//!   for the whole delivery).
//! - Handle errors internally; a panic propagates to the OS-facing caller.
//!
//! [`ReceiverFn`] adapts a closure into a [`ReceiverDelegate`].

use std::borrow::Cow;
use std::sync::Arc;

use crate::payload::{HostContext, ReceiverEvent, StartRequest, StartResult};

/// Shared handle to a receiver delegate.
pub type ReceiverDelegateRef = Arc<dyn ReceiverDelegate>;

/// Shared handle to a service delegate.
pub type ServiceDelegateRef = Arc<dyn ServiceDelegate>;

/// Handler of a single-event channel.
///
/// # Example
/// ```
/// use lifecycle_relay::{ReceiverDelegate, ReceiverEvent};
///
/// struct Rescheduler;
///
/// impl ReceiverDelegate for Rescheduler {
///     fn on_receive(&self, event: &ReceiverEvent) {
///         // re-arm alarms after boot...
///         let _ = event.intent.get_action();
///     }
///
///     fn name(&self) -> &str { "rescheduler" }
/// }
/// ```
pub trait ReceiverDelegate: Send + Sync + 'static {
    /// Handles one event, live or flushed from the cache.
    fn on_receive(&self, event: &ReceiverEvent);

    /// Name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Handler of a multi-phase service channel.
pub trait ServiceDelegate: Send + Sync + 'static {
    /// The service was created; `host` is the OS service instance.
    fn on_create(&self, host: &HostContext);

    /// A start request arrived. The returned value is handed to the OS for live calls and
    /// ignored for calls replayed from the cache.
    fn on_start_command(&self, request: &StartRequest) -> StartResult;

    /// The service is being destroyed.
    fn on_destroy(&self);

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Closure-backed receiver delegate.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use lifecycle_relay::{ReceiverDelegateRef, ReceiverEvent, ReceiverFn};
///
/// let d: ReceiverDelegateRef = ReceiverFn::arc("boot", |ev: &ReceiverEvent| {
///     let _ = ev.seq;
/// });
/// assert_eq!(d.name(), "boot");
/// ```
pub struct ReceiverFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ReceiverFn<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the delegate and returns it as a shared handle.
    ///
    /// Keep the returned `Arc` alive for as long as the delegate should stay attached.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> ReceiverDelegate for ReceiverFn<F>
where
    F: Fn(&ReceiverEvent) + Send + Sync + 'static,
{
    fn on_receive(&self, event: &ReceiverEvent) {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
