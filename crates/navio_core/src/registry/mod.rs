//! Per-type identity registry for live domain objects.
//!
//! # Responsibility
//! - Map a typed, copyable `ObjectId<T>` to the live instance it names.
//! - Let loosely coupled callers keep ids instead of object references.
//!
//! # Invariants
//! - One registry per entity type and per thread; objects never cross threads.
//! - An id resolves to at most one live instance.
//! - Once the owning handle is deleted or dropped, resolution yields `None`.
//! - Resolving a missing id is not an error.

mod id;
mod owned;

pub use id::ObjectId;
pub use owned::Owned;

use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Entity types that own a thread-local registry.
///
/// Implemented through [`registered_entity!`](crate::registered_entity).
pub trait Registered: Sized + 'static {
    /// Short entity name used in diagnostics.
    const KIND: &'static str;

    /// Runs `f` against this type's registry on the current thread.
    ///
    /// Returns `None` when the thread's registry has already been torn down.
    fn with_registry<R>(f: impl FnOnce(&mut Registry<Self>) -> R) -> Option<R>;
}

/// Declares the thread-local registry of one entity type.
#[macro_export]
macro_rules! registered_entity {
    ($ty:ty, $kind:literal) => {
        impl $crate::registry::Registered for $ty {
            const KIND: &'static str = $kind;

            fn with_registry<R>(
                f: impl FnOnce(&mut $crate::registry::Registry<Self>) -> R,
            ) -> Option<R> {
                thread_local! {
                    static REGISTRY: ::std::cell::RefCell<$crate::registry::Registry<$ty>> =
                        ::std::cell::RefCell::new($crate::registry::Registry::new());
                }
                REGISTRY
                    .try_with(|registry| {
                        registry
                            .try_borrow_mut()
                            .ok()
                            .map(|mut registry| f(&mut registry))
                    })
                    .ok()
                    .flatten()
            }
        }
    };
}

/// Identity table for one entity type.
///
/// Entries hold weak references; the strong reference lives in [`Owned`].
pub struct Registry<T> {
    entries: HashMap<Uuid, Weak<RefCell<T>>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `id -> object`. The last writer for an id wins.
    pub fn register(&mut self, id: ObjectId<T>, object: &Rc<RefCell<T>>) {
        self.entries
            .retain(|_, entry| entry.strong_count() > 0);
        self.entries.insert(id.uuid(), Rc::downgrade(object));
    }

    /// Removes the mapping for `id`. Returns whether an entry was present.
    pub fn unregister(&mut self, id: ObjectId<T>) -> bool {
        self.entries.remove(&id.uuid()).is_some()
    }

    /// Returns the live object for `id`, or `None` when it is gone.
    pub fn resolve(&self, id: ObjectId<T>) -> Option<Rc<RefCell<T>>> {
        let found = self.entries.get(&id.uuid()).and_then(Weak::upgrade);
        if found.is_none() {
            trace!("event=registry_resolve module=registry status=miss id={id}");
        }
        found
    }

    pub fn exists(&self, id: ObjectId<T>) -> bool {
        self.resolve(id).is_some()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all live entries, in no particular order.
    pub fn ids(&self) -> Vec<ObjectId<T>> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.strong_count() > 0)
            .map(|(uuid, _)| ObjectId::from_uuid(*uuid))
            .collect()
    }
}

/// Removes `id` from its type's registry on the current thread.
///
/// Safe to call for ids that were never registered or are already gone.
pub fn unregister<T: Registered>(id: ObjectId<T>) -> bool {
    T::with_registry(|registry| registry.unregister(id)).unwrap_or(false)
}

/// Number of live objects of type `T` on the current thread.
pub fn live_count<T: Registered>() -> usize {
    T::with_registry(|registry| registry.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{ObjectId, Registry};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct Beacon(u32);

    #[test]
    fn register_resolve_unregister() {
        let mut registry = Registry::new();
        let id = ObjectId::<Beacon>::new();
        let object = Rc::new(RefCell::new(Beacon(7)));

        registry.register(id, &object);
        assert!(registry.exists(id));
        assert_eq!(registry.resolve(id).map(|beacon| beacon.borrow().0), Some(7));

        assert!(registry.unregister(id));
        assert!(registry.resolve(id).is_none());
        assert!(!registry.unregister(id));
    }

    #[test]
    fn dropped_object_no_longer_resolves() {
        let mut registry = Registry::new();
        let id = ObjectId::<Beacon>::new();
        let object = Rc::new(RefCell::new(Beacon(1)));
        registry.register(id, &object);

        drop(object);
        assert!(!registry.exists(id));
        assert_eq!(registry.len(), 0);
        assert!(registry.ids().is_empty());
    }

    #[test]
    fn last_writer_wins_for_same_id() {
        let mut registry = Registry::new();
        let id = ObjectId::<Beacon>::new();
        let first = Rc::new(RefCell::new(Beacon(1)));
        let second = Rc::new(RefCell::new(Beacon(2)));

        registry.register(id, &first);
        registry.register(id, &second);

        assert_eq!(registry.resolve(id).map(|beacon| beacon.borrow().0), Some(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_purges_dead_entries() {
        let mut registry = Registry::new();
        let stale_id = ObjectId::<Beacon>::new();
        let stale = Rc::new(RefCell::new(Beacon(0)));
        registry.register(stale_id, &stale);
        drop(stale);

        let live = Rc::new(RefCell::new(Beacon(1)));
        registry.register(ObjectId::new(), &live);

        assert_eq!(registry.entries.len(), 1);
    }
}
