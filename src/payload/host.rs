//! # Opaque host component handle.
//!
//! [`HostContext`] wraps whatever the embedding layer uses to represent the OS component
//! (a receiver context, a service instance). Relays never look inside it; handlers
//! recover the concrete type with [`HostContext::downcast_ref`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Cheaply cloneable, type-erased handle to an OS component.
#[derive(Clone)]
pub struct HostContext {
    label: Arc<str>,
    inner: Arc<dyn Any + Send + Sync>,
}

impl HostContext {
    /// Wraps a host value under a human-readable label.
    ///
    /// # Example
    /// ```
    /// use lifecycle_relay::HostContext;
    ///
    /// struct Service { pid: u32 }
    ///
    /// let ctx = HostContext::new("alarm-runner", Service { pid: 7 });
    /// assert_eq!(ctx.downcast_ref::<Service>().map(|s| s.pid), Some(7));
    /// assert!(ctx.downcast_ref::<String>().is_none());
    /// ```
    pub fn new<T: Any + Send + Sync>(label: impl Into<Arc<str>>, value: T) -> Self {
        Self {
            label: label.into(),
            inner: Arc::new(value),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Borrows the host value as `T`, if that is what it holds.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    /// True if both handles point at the same host value.
    #[inline]
    pub fn same_host(&self, other: &HostContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostContext")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
