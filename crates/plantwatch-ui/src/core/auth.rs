//! Authentication session state.
//!
//! # Design
//! - `is_authenticated` and `is_2fa` are never both true; a stored blob that
//!   claims both is discarded on load.
//! - Every transition is persisted under one key; persistence is best-effort
//!   and never blocks the transition.

use std::cell::RefCell;

use plantwatch_api_models::{MenuItem, SubMenuItem, User};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::core::hierarchy::HierarchyScope;
use crate::core::menu::transform_menu_items;
use crate::core::observer::{Observable, Subscription};
use crate::core::storage::PersistentStore;

/// Storage key of the persisted session.
pub const AUTH_STORAGE_KEY: &str = "auth-data";

/// Persisted authentication snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Whether a full session is active.
    pub is_authenticated: bool,
    #[serde(default)]
    /// Signed-in (or 2FA-pending) user.
    pub user: Option<User>,
    #[serde(default)]
    /// Bearer token.
    pub token: Option<String>,
    #[serde(rename = "is2fa")]
    /// Whether the second factor is pending.
    pub is_2fa: bool,
    #[serde(default)]
    /// Navigable menu.
    pub menu: Vec<MenuItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Separately fetched submenu list.
    pub submenus: Option<Vec<SubMenuItem>>,
}

impl AuthState {
    /// Whether the state respects the single-mode rule.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        !(self.is_authenticated && self.is_2fa)
    }

    /// Whether the current user's role sits at `level`.
    #[must_use]
    pub fn has_role_level(&self, level: i32) -> bool {
        self.user
            .as_ref()
            .and_then(|user| user.role.as_ref())
            .and_then(|role| role.level)
            == Some(level)
    }
}

/// Owner of the auth session, its persistence, and its listeners.
#[derive(Debug)]
pub struct AuthStore {
    storage: PersistentStore,
    super_admin_level: i32,
    state: RefCell<AuthState>,
    observers: Observable<AuthState>,
}

impl AuthStore {
    /// Hydrate from storage; malformed blobs yield the logged-out state.
    #[must_use]
    pub fn load(storage: PersistentStore, super_admin_level: i32) -> Self {
        let state = match storage.get::<AuthState>(AUTH_STORAGE_KEY) {
            Some(state) if state.is_consistent() => state,
            Some(_) => {
                error!("discarding stored session with conflicting auth flags");
                AuthState::default()
            }
            None => AuthState::default(),
        };
        Self {
            storage,
            super_admin_level,
            state: RefCell::new(state),
            observers: Observable::new(),
        }
    }

    /// Role level treated as super administrator.
    #[must_use]
    pub const fn super_admin_level(&self) -> i32 {
        self.super_admin_level
    }

    /// Current session.
    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Listen for session changes.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }

    fn transition(&self, operation: &'static str, apply: impl FnOnce(&mut AuthState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            apply(&mut state);
            state.clone()
        };
        debug!(operation, authenticated = snapshot.is_authenticated, "auth transition");
        self.storage.set(AUTH_STORAGE_KEY, &snapshot);
        self.observers.notify(&snapshot);
    }

    /// Start a full session. Submenus from a previous session are dropped.
    pub fn login(&self, user: User, token: impl Into<String>, menu: &[MenuItem]) {
        let token = token.into();
        let menu = transform_menu_items(menu);
        self.transition("login", |state| {
            *state = AuthState {
                is_authenticated: true,
                user: Some(user),
                token: Some(token),
                is_2fa: false,
                menu,
                submenus: None,
            };
        });
    }

    /// Record a user whose second factor is still pending.
    pub fn information_2fa(&self, user: User) {
        self.transition("information_2fa", |state| {
            *state = AuthState {
                is_authenticated: false,
                user: Some(user),
                token: None,
                is_2fa: true,
                menu: Vec::new(),
                submenus: None,
            };
        });
    }

    /// Store a submenu list without touching anything else.
    pub fn save_sub_menus(&self, submenus: Vec<SubMenuItem>) {
        self.transition("save_sub_menus", |state| state.submenus = Some(submenus));
    }

    /// Restore the logged-out defaults and delete the stored entry.
    pub fn logout(&self) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            *state = AuthState::default();
            state.clone()
        };
        self.storage.remove(AUTH_STORAGE_KEY);
        debug!(operation = "logout", "auth transition");
        self.observers.notify(&snapshot);
    }

    /// Whether the current user's role is the super-administrator level.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.state.borrow().has_role_level(self.super_admin_level)
    }

    /// Scope assigned to the current user; empty when logged out.
    #[must_use]
    pub fn user_hierarchies(&self) -> HierarchyScope {
        self.state
            .borrow()
            .user
            .as_ref()
            .map(|user| HierarchyScope {
                account: user.account.clone(),
                plant: user.plant.clone(),
                area: user.area.clone(),
                system: user.system.clone(),
            })
            .unwrap_or_default()
    }

    /// Bearer token, if a session is active.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    /// Current user.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Whether a full session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    /// Whether the second factor is pending.
    #[must_use]
    pub fn is_two_factor_pending(&self) -> bool {
        self.state.borrow().is_2fa
    }
}
