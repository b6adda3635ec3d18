//! Application-scoped owner of every store.
//!
//! One [`Session`] exists per running UI or CLI process. It is built
//! explicitly from configuration and a storage backend, and torn down with
//! [`Session::end`].

use std::rc::Rc;

use plantwatch_api_models::{ApiError, LoginResponse, MenuItem, User};
use plantwatch_config::ClientConfig;
use thiserror::Error;
use tracing::info;

use crate::core::alert::UnauthorizedAlert;
use crate::core::api::report_unauthorized;
use crate::core::auth::AuthStore;
use crate::core::filter::HierarchyFilter;
use crate::core::hierarchy::HierarchyStore;
use crate::core::loading::LoadingIndicator;
use crate::core::storage::{PersistentStore, StorageBackend};

/// Session-level failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The login payload granted a session but carried no token.
    #[error("login response did not include a token")]
    MissingToken,
}

/// Result of applying a login payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A full session is active and the hierarchy is seeded.
    Authenticated,
    /// The server is waiting for a second factor.
    TwoFactorPending,
}

/// Stores and UI signals for one running client.
#[derive(Debug)]
pub struct Session {
    config: ClientConfig,
    storage: PersistentStore,
    auth: Rc<AuthStore>,
    hierarchy: Rc<HierarchyStore>,
    alert: Rc<UnauthorizedAlert>,
    loading: LoadingIndicator,
}

impl Session {
    /// Build the stores over `backend`, hydrating any persisted state.
    pub fn new(config: ClientConfig, backend: Rc<dyn StorageBackend>) -> Self {
        let storage = PersistentStore::from_config(&config, backend);
        let auth = Rc::new(AuthStore::load(storage.clone(), config.super_admin_level));
        let hierarchy = Rc::new(HierarchyStore::load(storage.clone()));
        Self {
            config,
            storage,
            auth,
            hierarchy,
            alert: Rc::new(UnauthorizedAlert::new()),
            loading: LoadingIndicator::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shared key-value store.
    #[must_use]
    pub const fn storage(&self) -> &PersistentStore {
        &self.storage
    }

    /// Auth store.
    #[must_use]
    pub const fn auth(&self) -> &Rc<AuthStore> {
        &self.auth
    }

    /// Hierarchy store.
    #[must_use]
    pub const fn hierarchy(&self) -> &Rc<HierarchyStore> {
        &self.hierarchy
    }

    /// Session-expired alert.
    #[must_use]
    pub const fn alert(&self) -> &Rc<UnauthorizedAlert> {
        &self.alert
    }

    /// Busy indicator.
    #[must_use]
    pub const fn loading(&self) -> &LoadingIndicator {
        &self.loading
    }

    /// Picker adapter bound to this session's hierarchy.
    #[must_use]
    pub fn hierarchy_filter(&self) -> HierarchyFilter {
        HierarchyFilter::new(Rc::clone(&self.hierarchy))
    }

    /// Start a full session and seed the hierarchy from the user's scope.
    pub fn complete_login(&self, user: User, token: impl Into<String>, menu: &[MenuItem]) {
        self.auth.login(user, token, menu);
        self.hierarchy.init_from_login(&self.auth.user_hierarchies());
        info!("session started");
    }

    /// Record a user waiting on the second factor.
    pub fn begin_two_factor(&self, user: User) {
        self.auth.information_2fa(user);
        info!("second factor pending");
    }

    /// Apply a login payload.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingToken`] when a full session is granted
    /// without a token.
    pub fn apply_login(&self, response: LoginResponse) -> Result<LoginOutcome, SessionError> {
        if response.requires_two_factor {
            self.begin_two_factor(response.user);
            return Ok(LoginOutcome::TwoFactorPending);
        }
        let token = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or(SessionError::MissingToken)?;
        self.complete_login(response.user, token, &response.menu);
        Ok(LoginOutcome::Authenticated)
    }

    /// Surface the session-expired alert for a 401.
    pub fn handle_api_error(&self, error: &ApiError) -> bool {
        report_unauthorized(error, &self.alert, &self.config.session_expired_message)
    }

    /// Log out and forget the hierarchy selection.
    pub fn end(&self) {
        self.auth.logout();
        self.hierarchy.clear();
        self.alert.dismiss();
        info!("session ended");
    }
}
