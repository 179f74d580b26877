//! Typed object identifier.

use super::Registered;
use std::cell::RefCell;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;
use uuid::Uuid;

/// Opaque, copyable handle naming one live object of type `T`.
///
/// Generated once per construction and never reused. Ids of different entity
/// types are distinct types and cannot be mixed up.
pub struct ObjectId<T> {
    uuid: Uuid,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ObjectId<T> {
    /// Generates a fresh id.
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wraps an existing UUID, e.g. one handed back by the UI host.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    /// Parses the hyphenated string form. Returns `None` for malformed input.
    pub fn parse_str(value: &str) -> Option<Self> {
        Uuid::parse_str(value.trim()).ok().map(Self::from_uuid)
    }

    pub fn uuid(self) -> Uuid {
        self.uuid
    }
}

impl<T: Registered> ObjectId<T> {
    /// Resolves this id to its live object on the current thread.
    pub fn resolve(self) -> Option<Rc<RefCell<T>>> {
        T::with_registry(|registry| registry.resolve(self)).flatten()
    }

    pub fn exists(self) -> bool {
        self.resolve().is_some()
    }

    /// Runs `f` with a shared borrow of the live object.
    ///
    /// Returns `None` when the object is gone or currently mutably borrowed.
    pub fn with<R>(self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let object = self.resolve()?;
        let borrowed = object.try_borrow().ok()?;
        Some(f(&borrowed))
    }

    /// Runs `f` with a mutable borrow of the live object.
    ///
    /// Returns `None` when the object is gone or currently borrowed.
    pub fn with_mut<R>(self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let object = self.resolve()?;
        let mut borrowed = object.try_borrow_mut().ok()?;
        Some(f(&mut borrowed))
    }
}

impl<T> Default for ObjectId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for ObjectId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ObjectId<T> {}

impl<T> PartialEq for ObjectId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl<T> Eq for ObjectId<T> {}

impl<T> Hash for ObjectId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uuid.hash(state);
    }
}

impl<T> Debug for ObjectId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.uuid)
    }
}

impl<T> Display for ObjectId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectId;
    use std::collections::HashSet;

    struct Marker;

    #[test]
    fn ids_are_unique_and_copyable() {
        let first = ObjectId::<Marker>::new();
        let copy = first;
        let second = ObjectId::<Marker>::new();

        assert_eq!(first, copy);
        assert_ne!(first, second);
        let set: HashSet<_> = [first, copy, second].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn parse_str_round_trips_display_form() {
        let id = ObjectId::<Marker>::new();
        let parsed = ObjectId::<Marker>::parse_str(&format!(" {id} ")).expect("valid id");
        assert_eq!(parsed, id);
        assert!(ObjectId::<Marker>::parse_str("not-a-uuid").is_none());
    }
}
