//! One-shot "session expired" alert latch.
//!
//! The first unauthorized response raises the alert and closes the latch;
//! further raises are ignored until [`UnauthorizedAlert::dismiss`] reopens it.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::observer::{Observable, Subscription};

/// What the alert banner should render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertState {
    /// Whether the banner is visible.
    pub show: bool,
    /// Banner text.
    pub message: String,
}

/// Latching alert store.
#[derive(Debug, Default)]
pub struct UnauthorizedAlert {
    state: RefCell<AlertState>,
    latched: Cell<bool>,
    observers: Observable<AlertState>,
}

impl UnauthorizedAlert {
    /// Hidden alert with an open latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` if the latch is open. Returns whether a new alert
    /// surfaced.
    pub fn raise(&self, message: &str) -> bool {
        if self.latched.replace(true) {
            return false;
        }
        info!("surfacing session-expired alert");
        self.publish(AlertState {
            show: true,
            message: message.to_string(),
        });
        true
    }

    /// Hide the alert and reopen the latch.
    pub fn dismiss(&self) {
        self.latched.set(false);
        self.publish(AlertState::default());
    }

    fn publish(&self, next: AlertState) {
        *self.state.borrow_mut() = next.clone();
        self.observers.notify(&next);
    }

    /// Current banner state.
    #[must_use]
    pub fn snapshot(&self) -> AlertState {
        self.state.borrow().clone()
    }

    /// Whether further raises are suppressed.
    #[must_use]
    pub fn is_latched(&self) -> bool {
        self.latched.get()
    }

    /// Listen for banner changes.
    pub fn subscribe(&self, listener: impl Fn(&AlertState) + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn consecutive_raises_surface_one_alert() {
        let alert = UnauthorizedAlert::new();
        let shown = Rc::new(Cell::new(0));
        let _subscription = {
            let shown = Rc::clone(&shown);
            alert.subscribe(move |state| {
                if state.show {
                    shown.set(shown.get() + 1);
                }
            })
        };
        assert!(alert.raise("expired"));
        assert!(!alert.raise("expired again"));
        assert_eq!(shown.get(), 1);
        assert_eq!(alert.snapshot().message, "expired");
    }

    #[test]
    fn dismiss_reopens_the_latch() {
        let alert = UnauthorizedAlert::new();
        assert!(alert.raise("first"));
        alert.dismiss();
        assert!(!alert.snapshot().show);
        assert!(!alert.is_latched());
        assert!(alert.raise("second"));
        assert_eq!(alert.snapshot().message, "second");
    }
}
