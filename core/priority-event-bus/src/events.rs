//! Event contract and the cancelable capability
//!
//! Any `'static + Send + Sync` type can be posted once it implements
//! [`Event`]. Cancellation is opt-in: an event reports the capability by
//! returning `Some` from [`Event::cancelable`], and the bus checks that
//! after every listener it runs.

use std::any::Any;

/// A value that can be posted on the bus.
///
/// ```rust
/// use priority_event_bus::{Cancelable, CancelFlag, Event};
///
/// struct OrderRequest {
///     qty: u32,
///     cancel: CancelFlag,
/// }
///
/// impl Event for OrderRequest {
///     fn cancelable(&self) -> Option<&dyn Cancelable> {
///         Some(&self.cancel)
///     }
/// }
/// ```
pub trait Event: Any + Send + Sync {
    /// Cancellation capability of this event, if it has one.
    ///
    /// Defaults to `None`: the event is delivered to every listener.
    fn cancelable(&self) -> Option<&dyn Cancelable> {
        None
    }
}

/// Mutable canceled flag exposed by cancelable events
pub trait Cancelable {
    fn is_canceled(&self) -> bool;
    
    fn set_canceled(&mut self, canceled: bool);
    
    /// Shorthand for `set_canceled(true)`
    fn cancel(&mut self) {
        self.set_canceled(true);
    }
}

/// Plain canceled flag, for composing into event structs.
///
/// Starts out not canceled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CancelFlag {
    canceled: bool,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cancelable for CancelFlag {
    #[inline]
    fn is_canceled(&self) -> bool {
        self.canceled
    }
    
    #[inline]
    fn set_canceled(&mut self, canceled: bool) {
        self.canceled = canceled;
    }
}
