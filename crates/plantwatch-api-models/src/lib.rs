#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
//! Shared HTTP DTOs for the Plantwatch maintenance API.
//!
//! These types are re-used by the browser client and the CLI for
//! request/response encoding to keep the contract deterministic. Field names
//! follow the API's camelCase wire format.

pub mod endpoints;
pub mod entities;
pub mod error;
pub mod outlook;
pub mod pagination;

pub use entities::{
    Account, Area, Asset, Component, EntityRef, LoginRequest, LoginResponse, MenuItem, Plant,
    Role, RoleRef, SubMenuItem, System, User,
};
pub use error::{ApiError, ErrorBody, ErrorDetail, UNAUTHORIZED_STATUS, error_message};
pub use outlook::{
    AlarmData, AssetFilter, AssetOutlookDto, ComponentOutlookDto, ComponentSummary,
    ComponentSummaryRequest,
};
pub use pagination::{
    ApiResponse, IdRef, ListFilters, PaginateData, PaginateRequest, PaginateResponse,
    SuccessResponse,
};
