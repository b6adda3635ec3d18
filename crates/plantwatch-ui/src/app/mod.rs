//! Browser wiring for the session: storage, global store, hooks.

use std::rc::Rc;

use gloo::console;
use plantwatch_config::ClientConfig;

use crate::core::observer::Subscription;
use crate::core::session::Session;
use crate::core::storage::{NoopStorage, StorageBackend};

mod hooks;
mod storage;
mod store;

pub use hooks::{
    SessionHandle, use_auth_state, use_hierarchy_filter, use_hierarchy_level, use_loading,
    use_session, use_unauthorized_alert,
};
pub use storage::BrowserStorage;
pub use store::bind_session;

/// A session bound to the page.
#[derive(Debug)]
pub struct BrowserSession {
    /// Shared session handle.
    pub session: Rc<Session>,
    _bindings: Vec<Subscription>,
}

impl BrowserSession {
    /// Context value for `ContextProvider<SessionHandle>`.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle(Rc::clone(&self.session))
    }
}

/// Build the session over `localStorage` and mirror it into yewdux.
///
/// Falls back to in-memory-only state when `localStorage` is unavailable.
#[must_use]
pub fn bootstrap(config: ClientConfig) -> BrowserSession {
    let backend: Rc<dyn StorageBackend> = match BrowserStorage::local() {
        Some(storage) => Rc::new(storage),
        None => {
            console::warn!("localStorage unavailable; session will not persist");
            Rc::new(NoopStorage)
        }
    };
    let session = Rc::new(Session::new(config, backend));
    let bindings = bind_session(&session);
    BrowserSession {
        session,
        _bindings: bindings,
    }
}
