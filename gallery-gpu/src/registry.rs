//! Typed handles to GPU resources owned by a [`ResourceRegistry`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

/// Type-safe resource handle
pub struct Handle<T> {
    id: u64,
    _phantom: PhantomData<fn() -> T>,
}

// Manual impls: derives would put bounds on `T`.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Handle<T> {}

impl<T> std::hash::Hash for Handle<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handle({})", self.id)
    }
}

impl<T> Handle<T> {
    fn next() -> Self {
        Self {
            id: HANDLE_ID.fetch_add(1, Ordering::Relaxed),
            _phantom: PhantomData,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

static HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Registry mapping handles to resources, one table per resource type.
#[derive(Default)]
pub struct ResourceRegistry {
    tables: HashMap<TypeId, Box<dyn Any>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table<T: 'static>(&self) -> Option<&HashMap<u64, T>> {
        self.tables
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    fn table_mut<T: 'static>(&mut self) -> &mut HashMap<u64, T> {
        self.tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HashMap::<u64, T>::new()))
            .downcast_mut()
            .expect("registry table keyed by its own TypeId")
    }

    /// Store a resource and return its handle.
    pub fn insert<T: 'static>(&mut self, resource: T) -> Handle<T> {
        let handle = Handle::next();
        self.table_mut::<T>().insert(handle.id, resource);
        handle
    }

    pub fn get<T: 'static>(&self, handle: Handle<T>) -> Option<&T> {
        self.table::<T>().and_then(|t| t.get(&handle.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_get_per_type() {
        let mut registry = ResourceRegistry::new();
        let a = registry.insert(5u32);
        let b = registry.insert(String::from("mat"));
        assert_eq!(registry.get(a), Some(&5));
        assert_eq!(registry.get(b).map(String::as_str), Some("mat"));
    }

    #[test]
    fn test_missing_type_table_is_none() {
        let mut registry = ResourceRegistry::new();
        let h = registry.insert(1u8);
        assert!(registry.get(Handle::<f64>::next()).is_none());
        assert_eq!(registry.get(h), Some(&1));
    }

    #[test]
    fn test_handles_are_unique() {
        let mut registry = ResourceRegistry::new();
        let a = registry.insert(0i32);
        let b = registry.insert(0i32);
        assert_ne!(a.id(), b.id());
    }
}
