//! Hierarchy entities, users, roles, and navigation menus.

use serde::{Deserialize, Serialize};

/// Lightweight reference to a hierarchy entity embedded in other payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Database identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Short business code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display description.
    pub description: Option<String>,
}

impl EntityRef {
    /// Reference carrying only an identifier and description.
    #[must_use]
    pub fn new(id: i64, description: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            code: None,
            description: Some(description.into()),
        }
    }
}

/// Role reference embedded in a [`User`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Role identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Role code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Role description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Role display name.
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Privilege level; compared against the super-administrator level.
    pub level: Option<i32>,
}

/// Authenticated user profile together with the administrator-assigned scope.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// User identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// User code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Login email.
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display name.
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Contact phone.
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Preferred UI language code.
    pub language_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whether the user signs in with a second factor.
    pub two_factor_auth: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Whether the account is blocked.
    pub is_blocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Role assigned to the user.
    pub role: Option<RoleRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Account scope.
    pub account: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Plant scope.
    pub plant: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Area scope.
    pub area: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// System scope.
    pub system: Option<EntityRef>,
}

/// Top-level navigation entry returned at login.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Visible label; also the source of the route slug.
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Direct route for leaf entries.
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Nested entries.
    pub menus: Option<Vec<SubMenuItem>>,
}

/// Nested navigation entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubMenuItem {
    /// Visible label.
    pub label: String,
    /// Route relative to the parent slug.
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Icon identifier.
    pub icon: Option<String>,
}

/// Credentials posted to `auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Payload returned by `auth/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Authenticated (or 2FA-pending) user.
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Bearer token; absent while the second factor is pending.
    pub token: Option<String>,
    #[serde(default)]
    /// Navigation menu granted to the user.
    pub menu: Vec<MenuItem>,
    #[serde(default)]
    /// Whether the server is waiting for a second factor.
    pub requires_two_factor: bool,
}

/// Customer account (hierarchy root).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    /// Identifier; `None` when creating.
    pub id: Option<i64>,
    #[serde(default)]
    /// Business code.
    pub code: String,
    #[serde(default)]
    /// Description.
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Contact name.
    pub name_contactor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Contact phone.
    pub telephone_contactor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Contact email.
    pub mail_contactor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
}

/// Plant belonging to an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(default)]
    /// Identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Business code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display order.
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Owning account.
    pub account: Option<EntityRef>,
}

/// Area belonging to a plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    #[serde(default)]
    /// Identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Business code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display order.
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Owning plant.
    pub plant: Option<EntityRef>,
}

/// System belonging to an area.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct System {
    #[serde(default)]
    /// Identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Business code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Display order.
    pub order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Owning area.
    pub area: Option<EntityRef>,
}

/// Asset belonging to a system.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(default)]
    /// Identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Business code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Nominal speed.
    pub rpm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Owning system.
    pub system: Option<EntityRef>,
}

/// Monitored component of an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default)]
    /// Identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Business code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Component type.
    pub component_type: Option<EntityRef>,
}

/// Role definition managed by administrators.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default)]
    /// Identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Role code.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Role description.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Privilege level.
    pub level: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    /// Granted permission identifiers.
    pub permissions: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_scope_deserializes_from_camel_case() {
        let user: User = serde_json::from_value(json!({
            "id": 4,
            "email": "ops@example.com",
            "twoFactorAuth": true,
            "role": { "id": 1, "level": 1 },
            "account": { "id": 5, "code": "ACME", "description": "Acme" },
            "system": { "id": 9, "description": "Cooling" }
        }))
        .expect("user should parse");
        assert_eq!(user.two_factor_auth, Some(true));
        assert_eq!(user.role.and_then(|role| role.level), Some(1));
        assert_eq!(user.account.and_then(|a| a.id), Some(5));
        assert!(user.plant.is_none());
        assert_eq!(
            user.system.and_then(|s| s.description).as_deref(),
            Some("Cooling")
        );
    }

    #[test]
    fn login_response_defaults_optional_fields() {
        let response: LoginResponse =
            serde_json::from_value(json!({ "user": { "id": 1 } })).expect("parse");
        assert!(response.token.is_none());
        assert!(response.menu.is_empty());
        assert!(!response.requires_two_factor);
    }

    #[test]
    fn absent_optionals_are_not_serialized() {
        let value = serde_json::to_value(EntityRef::new(3, "Line 3")).expect("serialize");
        assert_eq!(value, json!({ "id": 3, "description": "Line 3" }));
    }
}
