//! REST resource paths and query-string builders.

use crate::outlook::AssetFilter;
use crate::pagination::PaginateRequest;

/// Session probe.
pub const AUTH: &str = "auth";
/// Credential exchange.
pub const LOGIN: &str = "auth/login";
/// Session teardown.
pub const LOGOUT: &str = "auth/logout";
/// Users collection.
pub const USERS: &str = "users";
/// Accounts collection.
pub const ACCOUNTS: &str = "accounts";
/// Plants collection.
pub const PLANTS: &str = "plants";
/// Areas collection.
pub const AREAS: &str = "areas";
/// Systems collection.
pub const SYSTEMS: &str = "systems";
/// Assets collection.
pub const ASSETS: &str = "assets";
/// Components collection.
pub const COMPONENTS: &str = "component";
/// Plant failure catalogue.
pub const PLANT_FAILURES: &str = "plant-failures";
/// Plant lubricant catalogue.
pub const PLANT_LUBRICANTS: &str = "plant-lubricants";
/// Roles collection.
pub const ROLES: &str = "roles";
/// Technology summary flags for a set of components.
pub const COMPONENT_SUMMARY: &str = "component/get-with-flag-exist-summary";

/// Append an identifier segment when one is supplied.
#[must_use]
pub fn build_endpoint(base: &str, id: Option<&dyn std::fmt::Display>) -> String {
    match id {
        Some(id) => format!("{base}/{id}"),
        None => base.to_string(),
    }
}

/// Path for a single record of `resource`.
#[must_use]
pub fn record_path(resource: &str, id: i64) -> String {
    build_endpoint(resource, Some(&id))
}

/// Paginated list path: `<resource>?page=..&pageSize=..&filters.*=..`.
#[must_use]
pub fn list_path(resource: &str, request: &PaginateRequest) -> String {
    let mut pairs = vec![
        ("page".to_string(), request.page.to_string()),
        ("pageSize".to_string(), request.page_size.to_string()),
    ];
    pairs.extend(request.filters.query_pairs());
    format!("{resource}?{}", encode_query(&pairs))
}

/// Asset listing used by the outlook view, components included.
#[must_use]
pub fn assets_outlook_path(page: u32, page_size: u32, filter: &AssetFilter) -> String {
    format!("{ASSETS}?{}", encode_query(&filter.query_pairs(page, page_size)))
}

fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
