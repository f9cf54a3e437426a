//! Registered listener entries
//!
//! Listeners are stored type-erased so one registry can hold every
//! category. The typed closure is recovered by downcasting the posted
//! event back to the category's concrete type.

use crate::category::Category;
use crate::error::BusError;
use crate::events::Event;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Priority used when a registration does not set one
pub const DEFAULT_PRIORITY: i32 = 5;

/// Handle returned by every registration, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
    
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

type ErasedCallback = Arc<dyn Fn(&mut dyn Any) -> anyhow::Result<()> + Send + Sync>;

/// A listener plus its priority. Immutable once created.
#[derive(Clone)]
pub struct ListenerEntry {
    id: ListenerId,
    priority: i32,
    callback: ErasedCallback,
}

impl ListenerEntry {
    /// Wrap a typed listener for category `E`
    pub(crate) fn new<E, F>(priority: i32, listener: F) -> Self
    where
        E: Event,
        F: Fn(&mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let callback: ErasedCallback = Arc::new(move |event: &mut dyn Any| {
            match event.downcast_mut::<E>() {
                Some(event) => listener(event),
                None => Err(BusError::CategoryMismatch {
                    expected: Category::of::<E>(),
                }
                .into()),
            }
        });
        
        Self {
            id: ListenerId::next(),
            priority,
            callback,
        }
    }
    
    pub fn id(&self) -> ListenerId {
        self.id
    }
    
    pub fn priority(&self) -> i32 {
        self.priority
    }
    
    /// Run the listener. Errors come back exactly as the listener produced them.
    #[inline]
    pub(crate) fn invoke(&self, event: &mut dyn Any) -> anyhow::Result<()> {
        (self.callback)(event)
    }
}

impl fmt::Debug for ListenerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerEntry")
            .field("id", &self.id)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Stable sort, highest priority first. Equal priorities keep insertion order.
pub(crate) fn sort_by_priority(entries: &mut [ListenerEntry]) {
    entries.sort_by(|a, b| b.priority.cmp(&a.priority));
}
