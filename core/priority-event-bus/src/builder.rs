//! Fluent listener registration
//!
//! ```rust
//! use priority_event_bus::{Event, EventBus};
//!
//! struct Heartbeat;
//! impl Event for Heartbeat {}
//!
//! let bus = EventBus::new();
//! bus.listen::<Heartbeat>()
//!     .priority(10)
//!     .subscribe(|_| Ok(()))
//!     .unwrap();
//! ```

use crate::bus::EventBus;
use crate::error::BusError;
use crate::events::Event;
use crate::listener::ListenerId;
use std::marker::PhantomData;

/// Pending registration for events of type `E`.
///
/// Obtained from [`EventBus::listen`]; consumed by [`subscribe`](Self::subscribe).
#[must_use = "a listener is only registered once `subscribe` is called"]
pub struct ListenerBuilder<'a, E> {
    bus: &'a EventBus,
    priority: i32,
    _event: PhantomData<fn(&mut E)>,
}

impl<'a, E: Event> ListenerBuilder<'a, E> {
    pub(crate) fn new(bus: &'a EventBus, priority: i32) -> Self {
        Self {
            bus,
            priority,
            _event: PhantomData,
        }
    }
    
    /// Override the priority (higher runs first)
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
    
    /// Register the listener and finish the builder
    pub fn subscribe<F>(self, listener: F) -> Result<ListenerId, BusError>
    where
        F: Fn(&mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.bus.subscribe_with_priority(self.priority, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BusConfig;
    use crate::category::Category;

    struct Tick;
    impl Event for Tick {}

    #[test]
    fn test_builder_default_priority() {
        let bus = EventBus::new();
        bus.listen::<Tick>().subscribe(|_| Ok(())).unwrap();
        
        let list = bus.registry().lookup(Category::of::<Tick>()).unwrap();
        assert_eq!(list[0].priority(), 5);
    }

    #[test]
    fn test_builder_priority_override() {
        let bus = EventBus::new();
        let id = bus.listen::<Tick>().priority(-3).subscribe(|_| Ok(())).unwrap();
        
        let list = bus.registry().lookup(Category::of::<Tick>()).unwrap();
        assert_eq!(list[0].id(), id);
        assert_eq!(list[0].priority(), -3);
    }

    #[test]
    fn test_builder_uses_configured_default() {
        let bus = EventBus::with_config(BusConfig::default().with_default_priority(42)).unwrap();
        bus.listen::<Tick>().subscribe(|_| Ok(())).unwrap();
        
        let list = bus.registry().lookup(Category::of::<Tick>()).unwrap();
        assert_eq!(list[0].priority(), 42);
    }

    #[test]
    fn test_builder_last_priority_wins() {
        let bus = EventBus::new();
        bus.listen::<Tick>().priority(1).priority(8).subscribe(|_| Ok(())).unwrap();
        
        let list = bus.registry().lookup(Category::of::<Tick>()).unwrap();
        assert_eq!(list[0].priority(), 8);
    }
}
