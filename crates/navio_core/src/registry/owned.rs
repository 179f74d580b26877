//! Owning handle that ties registration to object lifetime.

use super::{ObjectId, Registered};
use log::{debug, warn};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Strong owner of one registered object.
///
/// Construction registers the object under a fresh id; dropping the handle (or
/// calling [`Owned::delete`]) unregisters it.
pub struct Owned<T: Registered> {
    id: ObjectId<T>,
    inner: Rc<RefCell<T>>,
}

impl<T: Registered> Owned<T> {
    pub fn new(value: T) -> Self {
        let id = ObjectId::new();
        let inner = Rc::new(RefCell::new(value));
        if T::with_registry(|registry| registry.register(id, &inner)).is_none() {
            warn!(
                "event=registry_register module=registry status=error kind={} error_code=registry_unavailable",
                T::KIND
            );
        } else {
            debug!(
                "event=registry_register module=registry status=ok kind={} id={id}",
                T::KIND
            );
        }
        Self { id, inner }
    }

    pub fn id(&self) -> ObjectId<T> {
        self.id
    }

    /// Shared borrow of the owned object.
    ///
    /// Panics if the object is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.inner.borrow()
    }

    /// Mutable borrow of the owned object.
    ///
    /// Panics if the object is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    /// Explicitly ends the object's registration and drops it.
    pub fn delete(self) {
        drop(self);
    }
}

impl<T: Registered> Drop for Owned<T> {
    fn drop(&mut self) {
        let id = self.id;
        let removed = T::with_registry(|registry| registry.unregister(id)).unwrap_or(false);
        debug!(
            "event=registry_unregister module=registry status=ok kind={} removed={removed}",
            T::KIND
        );
    }
}

impl<T: Registered + Debug> Debug for Owned<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Owned")
            .field("id", &self.id)
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Owned;
    use crate::registry::{live_count, unregister};

    #[derive(Debug)]
    struct Lamp {
        on: bool,
    }

    crate::registered_entity!(Lamp, "lamp");

    #[test]
    fn owned_registers_and_unregisters_on_drop() {
        let lamp = Owned::new(Lamp { on: false });
        let id = lamp.id();
        assert!(id.exists());
        assert_eq!(live_count::<Lamp>(), 1);

        id.with_mut(|lamp| lamp.on = true).expect("lamp is live");
        assert_eq!(id.with(|lamp| lamp.on), Some(true));

        drop(lamp);
        assert!(!id.exists());
        assert_eq!(id.with(|lamp| lamp.on), None);
        assert_eq!(live_count::<Lamp>(), 0);
    }

    #[test]
    fn explicit_delete_and_unregister_are_safe() {
        let lamp = Owned::new(Lamp { on: true });
        let id = lamp.id();

        assert!(unregister(id));
        assert!(!id.exists());
        assert!(!unregister(id));

        lamp.delete();
        assert!(!id.exists());
    }

    #[test]
    fn with_mut_returns_none_while_borrowed() {
        let lamp = Owned::new(Lamp { on: false });
        let id = lamp.id();

        let guard = lamp.borrow_mut();
        assert!(id.with_mut(|lamp| lamp.on = true).is_none());
        drop(guard);

        assert!(!lamp.borrow().on);
    }

    #[test]
    fn objects_are_invisible_to_other_threads() {
        let lamp = Owned::new(Lamp { on: true });
        let id = lamp.id();

        let seen_elsewhere = std::thread::spawn(move || id.exists())
            .join()
            .expect("thread should join");
        assert!(!seen_elsewhere);
        assert!(id.exists());
    }
}
