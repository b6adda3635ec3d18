//! Core, DOM-free primitives and helpers shared by the browser and the CLI.
pub mod alert;
pub mod api;
pub mod auth;
pub mod filter;
pub mod hierarchy;
pub mod loading;
pub mod menu;
pub mod navigation;
pub mod observer;
pub mod outlook;
pub mod session;
pub mod snapshot;
pub mod storage;
