//! Flat view of a [`Session`] for component rendering.

use crate::core::alert::AlertState;
use crate::core::auth::AuthState;
use crate::core::hierarchy::{HierarchyLevel, HierarchyState, HierarchyValue};
use crate::core::session::Session;

/// Everything a view needs to render the session chrome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Auth session.
    pub auth: AuthState,
    /// Hierarchy selection.
    pub hierarchy: HierarchyState,
    /// Session-expired banner.
    pub alert: AlertState,
    /// Whether a request is in flight.
    pub loading: bool,
    /// Whether the user is a super administrator.
    pub super_admin: bool,
}

impl SessionSnapshot {
    /// Capture the current state of every store.
    #[must_use]
    pub fn capture(session: &Session) -> Self {
        Self {
            auth: session.auth().snapshot(),
            hierarchy: session.hierarchy().snapshot(),
            alert: session.alert().snapshot(),
            loading: session.loading().is_loading(),
            super_admin: session.auth().is_super_admin(),
        }
    }

    /// Hierarchy value at `level`.
    #[must_use]
    pub fn level(&self, level: HierarchyLevel) -> HierarchyValue {
        self.hierarchy.get(level).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::MemoryStorage;
    use plantwatch_api_models::{EntityRef, User};
    use plantwatch_config::ClientConfig;
    use std::rc::Rc;

    #[test]
    fn capture_reflects_every_store() {
        let session = Session::new(ClientConfig::default(), Rc::new(MemoryStorage::new()));
        let user = User {
            plant: Some(EntityRef::new(2, "North")),
            ..User::default()
        };
        session.complete_login(user, "tok", &[]);
        let _busy = session.loading().begin();
        let snapshot = SessionSnapshot::capture(&session);
        assert!(snapshot.auth.is_authenticated);
        assert!(snapshot.loading);
        assert!(!snapshot.super_admin);
        assert_eq!(snapshot.level(HierarchyLevel::Plant).id, Some(2));
        assert!(!snapshot.alert.show);
    }
}
