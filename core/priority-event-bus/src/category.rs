//! Dispatch keys
//!
//! A [`Category`] identifies the exact concrete type of an event. Two
//! categories are equal only when they name the same type; there is no
//! notion of a parent category, so posting a wrapper type never reaches
//! listeners of the wrapped type.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Exact-type dispatch key
#[derive(Clone, Copy)]
pub struct Category {
    id: TypeId,
    name: &'static str,
}

impl Category {
    /// Category of the concrete type `E`
    #[inline]
    pub fn of<E: 'static>() -> Self {
        Self {
            id: TypeId::of::<E>(),
            name: type_name::<E>(),
        }
    }
    
    /// Type name, for logs only (not guaranteed stable across compilers)
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Category {}

impl Hash for Category {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Category").field(&self.name).finish()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
