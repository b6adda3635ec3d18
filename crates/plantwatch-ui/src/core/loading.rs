//! Global busy indicator driven by request guards.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::core::observer::{Observable, Subscription};

struct Inner {
    active: Cell<usize>,
    observers: Observable<bool>,
}

/// Observable flag that is `true` while any [`LoadingGuard`] is alive.
#[derive(Clone)]
pub struct LoadingIndicator {
    inner: Rc<Inner>,
}

impl LoadingIndicator {
    /// Idle indicator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                active: Cell::new(0),
                observers: Observable::new(),
            }),
        }
    }

    /// Mark a request in flight until the guard drops.
    pub fn begin(&self) -> LoadingGuard {
        let previous = self.inner.active.get();
        self.inner.active.set(previous + 1);
        if previous == 0 {
            self.inner.observers.notify(&true);
        }
        LoadingGuard {
            inner: Rc::clone(&self.inner),
        }
    }

    /// Whether any request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.active.get() > 0
    }

    /// Listen for idle/busy flips.
    pub fn subscribe(&self, listener: impl Fn(&bool) + 'static) -> Subscription {
        self.inner.observers.subscribe(listener)
    }
}

impl Default for LoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoadingIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingIndicator")
            .field("active", &self.inner.active.get())
            .finish()
    }
}

/// Keeps the indicator busy while alive.
#[must_use = "the indicator goes idle as soon as the guard drops"]
pub struct LoadingGuard {
    inner: Rc<Inner>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let remaining = self.inner.active.get().saturating_sub(1);
        self.inner.active.set(remaining);
        if remaining == 0 {
            self.inner.observers.notify(&false);
        }
    }
}

impl fmt::Debug for LoadingGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn busy_while_any_guard_lives() {
        let indicator = LoadingIndicator::new();
        let flips = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let flips = Rc::clone(&flips);
            indicator.subscribe(move |busy| flips.borrow_mut().push(*busy))
        };
        let first = indicator.begin();
        let second = indicator.begin();
        assert!(indicator.is_loading());
        drop(first);
        assert!(indicator.is_loading());
        drop(second);
        assert!(!indicator.is_loading());
        assert_eq!(*flips.borrow(), vec![true, false]);
    }
}
