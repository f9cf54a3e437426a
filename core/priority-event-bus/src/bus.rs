//! Core event bus implementation
//!
//! Dispatch is synchronous: `post` runs every listener of the event's exact
//! category on the calling thread, highest priority first, and returns
//! once the list is exhausted, the event is canceled, or a listener fails.

use crate::builder::ListenerBuilder;
use crate::category::Category;
use crate::config::BusConfig;
use crate::error::BusError;
use crate::events::Event;
use crate::listener::ListenerId;
use crate::registry::Registry;
use std::sync::{Arc, OnceLock};
use tracing::trace;

/// Outcome of a single `post` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Listeners that ran, including the one that canceled
    pub invoked: usize,
    
    /// Delivery stopped early because the event was canceled
    pub canceled: bool,
}

/// Priority-ordered, type-keyed event bus.
///
/// Cloning is cheap and every clone shares the same registry.
#[derive(Clone, Debug)]
pub struct EventBus {
    registry: Arc<Registry>,
    
    default_priority: i32,
}

impl EventBus {
    /// Create a new, isolated event bus with default settings
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            default_priority: BusConfig::default().default_priority,
        }
    }
    
    /// Create an event bus from a validated config
    pub fn with_config(config: BusConfig) -> Result<Self, BusError> {
        config.validate()?;
        
        Ok(Self {
            registry: Arc::new(Registry::with_limit(config.max_listeners_per_category)),
            default_priority: config.default_priority,
        })
    }
    
    /// Process-wide shared bus, created on first access
    pub fn global() -> &'static EventBus {
        static GLOBAL: OnceLock<EventBus> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            trace!("Initializing global event bus");
            EventBus::new()
        })
    }
    
    /// Start a registration for events of type `E`
    pub fn listen<E: Event>(&self) -> ListenerBuilder<'_, E> {
        ListenerBuilder::new(self, self.default_priority)
    }
    
    /// Register a listener at the default priority
    pub fn subscribe<E, F>(&self, listener: F) -> Result<ListenerId, BusError>
    where
        E: Event,
        F: Fn(&mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.registry.subscribe(self.default_priority, listener)
    }
    
    /// Register a listener with an explicit priority (higher runs first)
    pub fn subscribe_with_priority<E, F>(&self, priority: i32, listener: F) -> Result<ListenerId, BusError>
    where
        E: Event,
        F: Fn(&mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.registry.subscribe(priority, listener)
    }
    
    /// Remove a registration. Posts already in flight may still call it.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.registry.unsubscribe(id)
    }
    
    /// Deliver `event` to every listener of its exact type.
    ///
    /// Listeners run in descending priority order on the calling thread.
    /// After each one, a cancelable event that is now canceled stops
    /// delivery. The first listener error is returned unchanged and the
    /// remaining listeners are skipped. Posting a type nobody listens to
    /// is a no-op.
    pub fn post<E: Event>(&self, event: &mut E) -> anyhow::Result<Delivery> {
        let category = Category::of::<E>();
        
        // Snapshot; the map guard is released before any listener runs
        let Some(listeners) = self.registry.lookup(category) else {
            trace!(%category, "No listeners, dropping event");
            return Ok(Delivery::default());
        };
        
        let mut delivery = Delivery::default();
        for entry in listeners.iter() {
            entry.invoke(&mut *event)?;
            delivery.invoked += 1;
            
            if is_canceled(&*event) {
                trace!(%category, listener = %entry.id(), "Event canceled, stopping delivery");
                delivery.canceled = true;
                break;
            }
        }
        
        trace!(%category, invoked = delivery.invoked, "Event delivered");
        Ok(delivery)
    }
    
    /// Number of listeners currently registered for `E`
    pub fn listener_count<E: Event>(&self) -> usize {
        self.registry.listener_count(Category::of::<E>())
    }
    
    /// Underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
    
    pub fn default_priority(&self) -> i32 {
        self.default_priority
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn is_canceled(event: &dyn Event) -> bool {
    event.cancelable().map_or(false, |c| c.is_canceled())
}
