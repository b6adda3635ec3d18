//! Default values for client configuration.
//!
//! # Design
//! - Centralize defaults so the browser and CLI surfaces agree.
//! - Keep storage limits explicit; browsers cap `localStorage` around 5-10MB.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:7070";
/// Namespace prefix applied to every persisted key.
pub const DEFAULT_STORAGE_PREFIX: &str = "app_";
/// Largest serialized value accepted by the persistent store, in characters.
pub const DEFAULT_STORAGE_MAX_CHARS: usize = 5_000_000;
/// Role level granted to super administrators.
pub const DEFAULT_SUPER_ADMIN_LEVEL: i32 = 1;
/// Page size used by entity listings when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Page size used by the asset outlook table.
pub const DEFAULT_OUTLOOK_PAGE_SIZE: u32 = 100;
/// Largest page size accepted from configuration.
pub const MAX_PAGE_SIZE: u32 = 1_000;
/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Message surfaced once when the API rejects the session.
pub const DEFAULT_SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired or you are not authorized. Please sign in again.";
