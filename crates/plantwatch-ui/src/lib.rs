#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! Plantwatch client state.
//!
//! The `core` module holds DOM-free stores (storage, hierarchy, auth, alerts,
//! loading, outlook) that run natively and in the browser. Browser bindings
//! live behind `target_arch = "wasm32"`.

pub mod core;

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod services;

pub use crate::core::auth::{AuthState, AuthStore};
pub use crate::core::hierarchy::{
    HierarchyLevel, HierarchyScope, HierarchyState, HierarchyStore, HierarchyValue,
    LevelParseError,
};
pub use crate::core::observer::{Observable, Subscription};
pub use crate::core::session::{LoginOutcome, Session, SessionError};
pub use crate::core::storage::{
    MemoryStorage, NoopStorage, PersistentStore, StorageBackend, StorageError,
};
