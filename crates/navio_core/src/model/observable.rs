//! Observable field wrapper for live objects.
//!
//! # Responsibility
//! - Hold one value and a list of change listeners.
//! - Hand pending notifications back to the caller so listeners run after the
//!   owning object's borrow is released.
//!
//! # Invariants
//! - Listeners are only notified when the value actually changes.
//! - Listener order is subscription order.

use std::fmt::{Debug, Formatter};
use std::rc::Rc;

/// Listener handle returned by [`Observable::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<T> = Rc<dyn Fn(&T)>;

pub struct Observable<T> {
    value: T,
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener<T>)>,
}

impl<T: Clone + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn subscribe(&mut self, listener: impl Fn(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Removes one listener. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Replaces the value and returns the notification to dispatch.
    ///
    /// Returns `None` when the value is unchanged.
    #[must_use = "call `notify()` once the owning object is no longer borrowed"]
    pub fn set(&mut self, value: T) -> Option<Notification<T>> {
        if self.value == value {
            return None;
        }
        self.value = value;
        Some(Notification {
            value: self.value.clone(),
            listeners: self
                .listeners
                .iter()
                .map(|(_, listener)| Rc::clone(listener))
                .collect(),
        })
    }
}

impl<T: Debug> Debug for Observable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Pending change notification detached from the observed object.
pub struct Notification<T> {
    value: T,
    listeners: Vec<Listener<T>>,
}

impl<T> Notification<T> {
    pub fn notify(self) {
        for listener in &self.listeners {
            listener(&self.value);
        }
    }
}
