//! Observable properties with scoped subscriptions.
//!
//! A property notifies every subscriber synchronously each time it is set,
//! in subscription order. Subscribers receive a copy of the new value, so they
//! are free to read or write the property from inside the callback.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

type Observer<T> = Rc<dyn Fn(&T) + 'static>;

struct PropertyInner<T> {
    value: RefCell<T>,
    observers: RefCell<SmallVec<[(u64, Observer<T>); 2]>>,
    next_observer_id: Cell<u64>,
}

pub struct ObservableProperty<T: Clone + 'static> {
    inner: Rc<PropertyInner<T>>,
}

impl<T: Clone + 'static> Clone for ObservableProperty<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + 'static> ObservableProperty<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(PropertyInner {
                value: RefCell::new(value),
                observers: RefCell::new(SmallVec::new()),
                next_observer_id: Cell::new(1),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Stores `value` and notifies every subscriber, even when the value is unchanged.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value.clone();
        self.notify(&value);
    }

    /// Registers `observer` for future changes.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_observer_id.get();
        self.inner.next_observer_id.set(id + 1);
        let observer: Observer<T> = Rc::new(observer);
        self.inner.observers.borrow_mut().push((id, observer));

        let weak: Weak<PropertyInner<T>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner
                    .observers
                    .borrow_mut()
                    .retain(|(observer_id, _)| *observer_id != id);
            }
        })
    }

    /// Like [`subscribe`](Self::subscribe), but also delivers the current value right away.
    pub fn subscribe_with_initial(&self, observer: impl Fn(&T) + 'static) -> Subscription {
        let observer: Observer<T> = Rc::new(observer);
        let subscription = {
            let observer = Rc::clone(&observer);
            self.subscribe(move |value| observer(value))
        };
        let current = self.get();
        observer(&current);
        subscription
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.borrow().len()
    }

    fn notify(&self, value: &T) {
        let observers: SmallVec<[Observer<T>; 2]> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer(value);
        }
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for ObservableProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableProperty")
            .field("value", &*self.inner.value.borrow())
            .field("observers", &self.observer_count())
            .finish()
    }
}

/// Keeps an observer registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + 'static>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/observable_tests.rs"]
mod tests;
