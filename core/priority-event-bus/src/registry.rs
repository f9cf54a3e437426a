//! Listener storage
//!
//! Maps each [`Category`] to an immutable, priority-sorted snapshot of its
//! listeners. Writers never touch a published snapshot: they build a new
//! list under the map's per-key write lock and swap it in, so a `post`
//! that already holds the old `Arc` keeps iterating a consistent list.

use crate::category::Category;
use crate::error::BusError;
use crate::events::Event;
use crate::listener::{sort_by_priority, ListenerEntry, ListenerId};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Ordered listeners of one category, as seen at lookup time
pub type ListenerSnapshot = Arc<Vec<ListenerEntry>>;

/// Concurrent category -> listener list map
pub struct Registry {
    listeners: DashMap<Category, ListenerSnapshot>,
    
    /// Per-category cap, checked on subscribe
    max_listeners: Option<usize>,
}

impl Registry {
    /// Create an empty, unbounded registry
    pub fn new() -> Self {
        Self::with_limit(None)
    }
    
    pub(crate) fn with_limit(max_listeners: Option<usize>) -> Self {
        Self {
            listeners: DashMap::new(),
            max_listeners,
        }
    }
    
    /// Register `listener` for events of type `E`.
    ///
    /// The list is re-sorted after the append; entries with equal priority
    /// stay in registration order. The same closure may be registered any
    /// number of times and runs once per registration.
    pub fn subscribe<E, F>(&self, priority: i32, listener: F) -> Result<ListenerId, BusError>
    where
        E: Event,
        F: Fn(&mut E) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let category = Category::of::<E>();
        let entry = ListenerEntry::new::<E, F>(priority, listener);
        let id = entry.id();
        
        let mut slot = self.listeners.entry(category).or_insert_with(|| {
            debug!("Creating listener list for category: {}", category);
            Arc::new(Vec::new())
        });
        
        if let Some(limit) = self.max_listeners {
            if slot.len() >= limit {
                warn!(%category, limit, "Listener limit reached, rejecting registration");
                return Err(BusError::ListenerLimit { category, limit });
            }
        }
        
        // Copy-on-write: readers holding the old snapshot are unaffected
        let mut next = Vec::with_capacity(slot.len() + 1);
        next.extend(slot.iter().cloned());
        next.push(entry);
        sort_by_priority(&mut next);
        *slot = Arc::new(next);
        
        debug!(%category, %id, priority, "Listener registered");
        Ok(id)
    }
    
    /// Remove a registration. Returns `false` if the id is unknown.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut emptied = None;
        let mut removed = false;
        
        for mut slot in self.listeners.iter_mut() {
            if !slot.iter().any(|entry| entry.id() == id) {
                continue;
            }
            
            let next: Vec<_> = slot.iter().filter(|entry| entry.id() != id).cloned().collect();
            if next.is_empty() {
                emptied = Some(*slot.key());
            }
            *slot.value_mut() = Arc::new(next);
            
            debug!(category = %slot.key(), %id, "Listener removed");
            removed = true;
            break;
        }
        
        // A concurrent subscribe may have refilled the list in between
        if let Some(category) = emptied {
            self.listeners.remove_if(&category, |_, list| list.is_empty());
        }
        
        removed
    }
    
    /// Current snapshot for an exact category, if any listener was registered
    pub fn lookup(&self, category: Category) -> Option<ListenerSnapshot> {
        self.listeners.get(&category).map(|slot| Arc::clone(slot.value()))
    }
    
    pub fn listener_count(&self, category: Category) -> usize {
        self.listeners.get(&category).map_or(0, |slot| slot.len())
    }
    
    /// Categories that currently have a listener list
    pub fn categories(&self) -> Vec<Category> {
        self.listeners.iter().map(|slot| *slot.key()).collect()
    }
    
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
    
    /// Drop every registration
    pub fn clear(&self) {
        self.listeners.clear();
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("categories", &self.listeners.len())
            .field("max_listeners", &self.max_listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Trade;
    impl Event for Trade {}

    struct Quote;
    impl Event for Quote {}

    fn noop<E>(_: &mut E) -> anyhow::Result<()> {
        Ok(())
    }

    #[test]
    fn test_lookup_absent_category() {
        let registry = Registry::new();
        
        assert!(registry.lookup(Category::of::<Trade>()).is_none());
        assert_eq!(registry.listener_count(Category::of::<Trade>()), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_subscribe_sorts_by_priority() {
        let registry = Registry::new();
        
        let low = registry.subscribe::<Trade, _>(2, noop).unwrap();
        let high = registry.subscribe::<Trade, _>(10, noop).unwrap();
        let mid = registry.subscribe::<Trade, _>(6, noop).unwrap();
        let mid2 = registry.subscribe::<Trade, _>(6, noop).unwrap();
        
        let list = registry.lookup(Category::of::<Trade>()).unwrap();
        let ids: Vec<_> = list.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![high, mid, mid2, low]);
    }

    #[test]
    fn test_duplicate_listener_registered_twice() {
        let registry = Registry::new();
        
        let a = registry.subscribe::<Trade, _>(5, noop).unwrap();
        let b = registry.subscribe::<Trade, _>(5, noop).unwrap();
        
        assert_ne!(a, b);
        assert_eq!(registry.listener_count(Category::of::<Trade>()), 2);
    }

    #[test]
    fn test_categories_are_separate() {
        let registry = Registry::new();
        
        registry.subscribe::<Trade, _>(5, noop).unwrap();
        registry.subscribe::<Quote, _>(5, noop).unwrap();
        registry.subscribe::<Quote, _>(5, noop).unwrap();
        
        assert_eq!(registry.listener_count(Category::of::<Trade>()), 1);
        assert_eq!(registry.listener_count(Category::of::<Quote>()), 2);
        
        let cats: HashSet<_> = registry.categories().into_iter().collect();
        assert_eq!(cats.len(), 2);
    }

    #[test]
    fn test_snapshot_unaffected_by_later_subscribe() {
        let registry = Registry::new();
        registry.subscribe::<Trade, _>(1, noop).unwrap();
        
        let before = registry.lookup(Category::of::<Trade>()).unwrap();
        registry.subscribe::<Trade, _>(99, noop).unwrap();
        
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].priority(), 1);
        
        let after = registry.lookup(Category::of::<Trade>()).unwrap();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0].priority(), 99);
    }

    #[test]
    fn test_listener_limit() {
        let registry = Registry::with_limit(Some(2));
        
        registry.subscribe::<Trade, _>(5, noop).unwrap();
        registry.subscribe::<Trade, _>(5, noop).unwrap();
        let err = registry.subscribe::<Trade, _>(5, noop).unwrap_err();
        
        assert!(matches!(err, BusError::ListenerLimit { limit: 2, .. }));
        assert_eq!(registry.listener_count(Category::of::<Trade>()), 2);
        
        // Limit is per category
        assert!(registry.subscribe::<Quote, _>(5, noop).is_ok());
    }

    #[test]
    fn test_unsubscribe() {
        let registry = Registry::new();
        
        let a = registry.subscribe::<Trade, _>(5, noop).unwrap();
        let b = registry.subscribe::<Trade, _>(7, noop).unwrap();
        
        assert!(registry.unsubscribe(b));
        assert!(!registry.unsubscribe(b));
        
        let list = registry.lookup(Category::of::<Trade>()).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id(), a);
        
        // Last listener removed drops the category
        assert!(registry.unsubscribe(a));
        assert!(registry.lookup(Category::of::<Trade>()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear() {
        let registry = Registry::new();
        registry.subscribe::<Trade, _>(5, noop).unwrap();
        registry.subscribe::<Quote, _>(5, noop).unwrap();
        
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_subscribe() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 50;
        
        let registry = Registry::new();
        let ids = parking_lot::Mutex::new(Vec::new());
        
        crossbeam::scope(|s| {
            for t in 0..THREADS {
                let registry = &registry;
                let ids = &ids;
                s.spawn(move |_| {
                    for i in 0..PER_THREAD {
                        let priority = ((t * PER_THREAD + i) % 13) as i32;
                        let id = registry.subscribe::<Trade, _>(priority, noop).unwrap();
                        ids.lock().push(id);
                    }
                });
            }
        })
        .unwrap();
        
        let list = registry.lookup(Category::of::<Trade>()).unwrap();
        assert_eq!(list.len(), THREADS * PER_THREAD);
        
        // Every registration present exactly once
        let registered: HashSet<_> = ids.into_inner().into_iter().collect();
        let stored: HashSet<_> = list.iter().map(|e| e.id()).collect();
        assert_eq!(stored.len(), list.len());
        assert_eq!(stored, registered);
        
        // Still sorted
        assert!(list.windows(2).all(|w| w[0].priority() >= w[1].priority()));
    }
}
