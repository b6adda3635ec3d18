//! Response envelopes, pagination, and list filters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope wrapping every JSON body returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Server-side correlation identifier.
    pub tracking_id: Option<String>,
    /// Response payload.
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Status block (carries `description` on failures).
    pub response: Option<Value>,
}

/// Paginated list payload as returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginateData<T> {
    #[serde(default)]
    /// Server success flag.
    pub ok: bool,
    #[serde(default = "Vec::new")]
    /// Page records.
    pub records: Vec<T>,
    #[serde(default)]
    /// Total rows across all pages.
    pub total: u64,
}

/// Paginated list normalised for callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginateResponse<T> {
    /// Rows on the requested page.
    pub rows: Vec<T>,
    /// Requested page (1-based).
    pub page: u32,
    /// Requested page size.
    pub size: u32,
    /// Total rows across all pages.
    pub total: u64,
}

impl<T> PaginateResponse<T> {
    /// Normalise a wire payload for the page that was requested.
    #[must_use]
    pub fn from_data(data: PaginateData<T>, request: &PaginateRequest) -> Self {
        Self {
            rows: data.records,
            page: request.page,
            size: request.page_size,
            total: data.total,
        }
    }
}

/// Body returned by create/update/delete calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuccessResponse {
    /// Always `true` when the call succeeded.
    pub success: bool,
}

impl SuccessResponse {
    /// Successful acknowledgement.
    pub const OK: Self = Self { success: true };
}

/// Identifier-only reference used in filters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdRef {
    /// Referenced identifier.
    pub id: i64,
}

/// Filters accepted by list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Code substring.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Description substring.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Account restriction.
    pub account: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Plant restriction.
    pub plant: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Area restriction.
    pub area: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// System restriction.
    pub system: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Asset restriction.
    pub asset: Option<IdRef>,
}

impl ListFilters {
    /// Flatten into `filters.<field>` query pairs, skipping unset filters.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(code) = self.code.as_deref().filter(|v| !v.is_empty()) {
            pairs.push(("filters.code".to_string(), code.to_string()));
        }
        if let Some(description) = self.description.as_deref().filter(|v| !v.is_empty()) {
            pairs.push(("filters.description".to_string(), description.to_string()));
        }
        let nested = [
            ("account", self.account),
            ("plant", self.plant),
            ("area", self.area),
            ("system", self.system),
            ("asset", self.asset),
        ];
        for (name, reference) in nested {
            if let Some(reference) = reference {
                pairs.push((format!("filters.{name}.id"), reference.id.to_string()));
            }
        }
        pairs
    }
}

/// Page request for list endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginateRequest {
    /// Page to fetch (1-based).
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Filters applied server-side.
    pub filters: ListFilters,
}

impl Default for PaginateRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            filters: ListFilters::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_pairs_flatten_nested_ids() {
        let filters = ListFilters {
            code: Some("P-1".into()),
            description: Some(String::new()),
            plant: Some(IdRef { id: 3 }),
            system: Some(IdRef { id: 9 }),
            ..ListFilters::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("filters.code".to_string(), "P-1".to_string()),
                ("filters.plant.id".to_string(), "3".to_string()),
                ("filters.system.id".to_string(), "9".to_string()),
            ]
        );
    }

    #[test]
    fn paginate_data_tolerates_missing_records() {
        let data: PaginateData<i64> = serde_json::from_value(json!({ "ok": true })).expect("parse");
        let response = PaginateResponse::from_data(data, &PaginateRequest::default());
        assert!(response.rows.is_empty());
        assert_eq!(response.page, 1);
        assert_eq!(response.size, 10);
        assert_eq!(response.total, 0);
    }
}
