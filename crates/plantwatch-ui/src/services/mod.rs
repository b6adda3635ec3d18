//! Network services for the browser client.

pub mod api;

pub use api::ApiClient;
