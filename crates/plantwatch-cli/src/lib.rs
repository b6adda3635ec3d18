#![forbid(unsafe_code)]
#![deny(
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate, clippy::future_not_send)]

//! Command-line client for the Plantwatch maintenance dashboard.
//!
//! Layout:
//! - `cli.rs`: argument parsing, session bootstrap, and command dispatch
//! - `commands/`: command handlers grouped by concern
//! - `client.rs`: HTTP client, error classification, and exit codes
//! - `state.rs`: file-backed storage for the persisted session
//! - `output.rs`: renderers and formatting helpers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod state;

pub use cli::run;
