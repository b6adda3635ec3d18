//! Component hooks over the session.

use std::rc::Rc;

use yew::prelude::*;
use yewdux::prelude::{use_selector, use_selector_with_deps};

use crate::core::alert::AlertState;
use crate::core::auth::AuthState;
use crate::core::filter::HierarchyFilter;
use crate::core::hierarchy::{HierarchyLevel, HierarchyValue};
use crate::core::session::Session;
use crate::core::snapshot::SessionSnapshot;

/// Context value carrying the running session.
#[derive(Debug, Clone)]
pub struct SessionHandle(pub Rc<Session>);

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Session provided by the nearest `ContextProvider<SessionHandle>`.
#[hook]
pub fn use_session() -> Option<Rc<Session>> {
    use_context::<SessionHandle>().map(|handle| handle.0)
}

/// Current value of one hierarchy level; re-renders only when it changes.
#[hook]
pub fn use_hierarchy_level(level: HierarchyLevel) -> HierarchyValue {
    let value = use_selector_with_deps(
        |snapshot: &SessionSnapshot, level: &HierarchyLevel| snapshot.level(*level),
        level,
    );
    (*value).clone()
}

/// Picker adapter plus the value it edits.
#[hook]
pub fn use_hierarchy_filter(level: HierarchyLevel) -> (HierarchyValue, Option<HierarchyFilter>) {
    let value = use_hierarchy_level(level);
    let filter = use_session().map(|session| session.hierarchy_filter());
    (value, filter)
}

/// Current auth session.
#[hook]
pub fn use_auth_state() -> AuthState {
    let auth = use_selector(|snapshot: &SessionSnapshot| snapshot.auth.clone());
    (*auth).clone()
}

/// Session-expired banner state.
#[hook]
pub fn use_unauthorized_alert() -> AlertState {
    let alert = use_selector(|snapshot: &SessionSnapshot| snapshot.alert.clone());
    (*alert).clone()
}

/// Whether any request is in flight.
#[hook]
pub fn use_loading() -> bool {
    *use_selector(|snapshot: &SessionSnapshot| snapshot.loading)
}
