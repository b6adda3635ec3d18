//! Normalised API failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status used when the server rejects the session.
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// Failure surfaced to callers for any non-success response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (status {status})")]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable message extracted from the body.
    pub message: String,
}

impl ApiError {
    /// Build an error from a status and message.
    #[must_use]
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The fixed error produced for a 401 response.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(UNAUTHORIZED_STATUS, "Unauthorized")
    }

    /// Whether the server rejected the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == UNAUTHORIZED_STATUS
    }

    /// Build an error from a raw failure body.
    #[must_use]
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        if status == UNAUTHORIZED_STATUS {
            return Self::unauthorized();
        }
        Self::new(status, error_message(status, body))
    }
}

/// Nested status block carried by failure bodies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Preferred human-readable description.
    pub description: Option<String>,
}

/// Shape of a failure body. Both fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Status block.
    pub response: Option<ErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Fallback message.
    pub message: Option<String>,
}

/// Pick the message for a failed response: `response.description`, then
/// `message`, then a generic status line. Bodies that are not JSON fall
/// through to the generic line.
#[must_use]
pub fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| {
            parsed
                .response
                .and_then(|detail| detail.description)
                .filter(|text| !text.is_empty())
                .or_else(|| parsed.message.filter(|text| !text.is_empty()))
        })
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_wins_over_message() {
        let body = br#"{"response":{"description":"Plant code taken"},"message":"Conflict"}"#;
        assert_eq!(error_message(409, body), "Plant code taken");
    }

    #[test]
    fn message_used_without_description() {
        assert_eq!(error_message(400, br#"{"message":"Bad filter"}"#), "Bad filter");
    }

    #[test]
    fn unparseable_body_falls_back_to_status() {
        assert_eq!(error_message(502, b"<html>gateway</html>"), "Request failed with status 502");
        assert_eq!(error_message(500, b""), "Request failed with status 500");
    }

    #[test]
    fn unauthorized_ignores_body() {
        let err = ApiError::from_body(401, br#"{"message":"token expired"}"#);
        assert_eq!(err, ApiError::unauthorized());
        assert!(err.is_unauthorized());
        assert_eq!(err.message, "Unauthorized");
    }
}
