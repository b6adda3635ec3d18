//! Synchronous observer primitive backing every store.
//!
//! # Design
//! - The observable owns its listener set; subscribers hold a [`Subscription`].
//! - Delivery is synchronous and happens after the owning store has released
//!   its own borrows, so listeners may read the store they observe.
//! - Listeners added or removed during delivery take effect on the next
//!   notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// Listener set that delivers snapshots of `T`.
pub struct Observable<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> Observable<T> {
    /// Empty listener set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `listener`; it stays active until the returned handle is
    /// dropped or [`Subscription::unsubscribe`] is called.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(listener)));
            id
        };
        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Deliver `value` to every current listener, in subscription order.
    pub fn notify(&self, value: &T) {
        let listeners: Vec<Listener<T>> = self
            .registry
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(value);
        }
    }

    /// Number of active listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }
}

impl<T: 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("listeners", &self.registry.borrow().entries.len())
            .finish()
    }
}

/// Handle for an active listener. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Remove the listener now.
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Keep the listener registered for the lifetime of the observable.
    pub fn detach(mut self) {
        self.cancel = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn listeners_receive_values_in_order() {
        let observable = Observable::<u32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let first = {
            let seen = Rc::clone(&seen);
            observable.subscribe(move |value| seen.borrow_mut().push(("first", *value)))
        };
        let second = {
            let seen = Rc::clone(&seen);
            observable.subscribe(move |value| seen.borrow_mut().push(("second", *value)))
        };
        observable.notify(&7);
        assert_eq!(&*seen.borrow(), &[("first", 7), ("second", 7)]);
        drop((first, second));
    }

    #[test]
    fn dropping_subscription_stops_delivery() {
        let observable = Observable::<u32>::new();
        let count = Rc::new(Cell::new(0));
        let subscription = {
            let count = Rc::clone(&count);
            observable.subscribe(move |_| count.set(count.get() + 1))
        };
        observable.notify(&1);
        drop(subscription);
        observable.notify(&2);
        assert_eq!(count.get(), 1);
        assert_eq!(observable.listener_count(), 0);
    }

    #[test]
    fn detached_listener_survives_handle() {
        let observable = Observable::<u32>::new();
        let count = Rc::new(Cell::new(0));
        {
            let count = Rc::clone(&count);
            observable
                .subscribe(move |_| count.set(count.get() + 1))
                .detach();
        }
        observable.notify(&1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn unsubscribe_during_delivery_is_safe() {
        let observable = Rc::new(Observable::<u32>::new());
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let subscription = {
            let slot = Rc::clone(&slot);
            observable.subscribe(move |_| {
                slot.borrow_mut().take();
            })
        };
        *slot.borrow_mut() = Some(subscription);
        observable.notify(&1);
        assert_eq!(observable.listener_count(), 0);
    }
}
