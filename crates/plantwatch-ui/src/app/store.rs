//! Mirror of the session stores in the yewdux global store.

use yewdux::prelude::Dispatch;
use yewdux::store::Store;

use crate::core::observer::Subscription;
use crate::core::session::Session;
use crate::core::snapshot::SessionSnapshot;

impl Store for SessionSnapshot {
    fn new() -> Self {
        Self::default()
    }

    fn should_notify(&self, old: &Self) -> bool {
        self != old
    }
}

/// Seed the yewdux store from `session` and keep it in sync.
///
/// The returned subscriptions must outlive the mounted app.
pub fn bind_session(session: &Session) -> Vec<Subscription> {
    let dispatch = Dispatch::<SessionSnapshot>::new();
    dispatch.set(SessionSnapshot::capture(session));
    let super_admin_level = session.auth().super_admin_level();

    let auth = {
        let dispatch = dispatch.clone();
        session.auth().subscribe(move |state| {
            let state = state.clone();
            dispatch.reduce_mut(move |snapshot| {
                snapshot.super_admin = state.has_role_level(super_admin_level);
                snapshot.auth = state;
            });
        })
    };
    let hierarchy = {
        let dispatch = dispatch.clone();
        session.hierarchy().subscribe(move |state| {
            let state = state.clone();
            dispatch.reduce_mut(move |snapshot| snapshot.hierarchy = state);
        })
    };
    let alert = {
        let dispatch = dispatch.clone();
        session.alert().subscribe(move |state| {
            let state = state.clone();
            dispatch.reduce_mut(move |snapshot| snapshot.alert = state);
        })
    };
    let loading = session.loading().subscribe(move |busy| {
        let busy = *busy;
        dispatch.reduce_mut(move |snapshot| snapshot.loading = busy);
    });

    vec![auth, hierarchy, alert, loading]
}
