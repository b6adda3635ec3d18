//! Command handlers grouped by concern.

pub(crate) mod auth;
pub(crate) mod hierarchy;
pub(crate) mod list;
pub(crate) mod outlook;
