//! Transport-independent request helpers shared by the browser and CLI clients.
//!
//! # Design
//! - Transports send the request and hand the raw status and body to
//!   [`interpret_response`]; error normalisation lives here once.
//! - 201 and 204 carry no body and become `{"success": true}`.

use std::fmt;

use plantwatch_api_models::{ApiError, SuccessResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::core::alert::UnauthorizedAlert;

/// Verbs exposed by the API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join the API base and a relative path with exactly one slash.
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// `Authorization` header value for `token`.
#[must_use]
pub fn bearer(token: Option<&str>) -> Option<String> {
    token
        .filter(|token| !token.is_empty())
        .map(|token| format!("Bearer {token}"))
}

/// Turn a raw response into JSON or a normalised [`ApiError`].
///
/// # Errors
///
/// Returns [`ApiError::unauthorized`] for 401, an error built from the body for
/// any other non-2xx status, and a decode error for unreadable 2xx bodies.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::from_body(status, body));
    }
    if status == 201 || status == 204 {
        return serde_json::to_value(SuccessResponse::OK)
            .map_err(|err| ApiError::new(status, format!("invalid response body: {err}")));
    }
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|err| ApiError::new(status, format!("invalid response body: {err}")))
}

/// Decode a successful JSON payload into `T`.
///
/// # Errors
///
/// Returns an [`ApiError`] carrying `status` when the payload does not match.
pub fn decode<T: DeserializeOwned>(status: u16, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|err| ApiError::new(status, format!("unexpected response shape: {err}")))
}

/// Surface the session-expired alert when `error` is a 401. Returns whether a
/// new alert was shown.
pub fn report_unauthorized(error: &ApiError, alert: &UnauthorizedAlert, message: &str) -> bool {
    error.is_unauthorized() && alert.raise(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_api_models::{ApiResponse, SuccessResponse};
    use serde_json::json;

    #[test]
    fn join_url_normalises_slashes() {
        assert_eq!(join_url("http://api/", "/plants"), "http://api/plants");
        assert_eq!(join_url("http://api", "plants?page=1"), "http://api/plants?page=1");
    }

    #[test]
    fn bearer_skips_missing_tokens() {
        assert_eq!(bearer(Some("abc")).as_deref(), Some("Bearer abc"));
        assert_eq!(bearer(Some("")), None);
        assert_eq!(bearer(None), None);
    }

    #[test]
    fn created_and_no_content_become_success() {
        for status in [201, 204] {
            let value = interpret_response(status, b"").expect("success");
            let parsed: SuccessResponse = decode(status, value).expect("decode");
            assert_eq!(parsed, SuccessResponse::OK);
        }
    }

    #[test]
    fn failures_are_normalised() {
        let err = interpret_response(404, br#"{"message":"Plant not found"}"#).expect_err("404");
        assert_eq!(err, ApiError::new(404, "Plant not found"));
        let err = interpret_response(401, b"{}").expect_err("401");
        assert_eq!(err, ApiError::unauthorized());
    }

    #[test]
    fn ok_bodies_decode_into_envelopes() {
        let body = serde_json::to_vec(&json!({ "trackingId": "t-1", "data": [1, 2] })).expect("body");
        let value = interpret_response(200, &body).expect("ok");
        let envelope: ApiResponse<Vec<i64>> = decode(200, value).expect("decode");
        assert_eq!(envelope.data, vec![1, 2]);
    }

    #[test]
    fn garbage_success_body_is_an_error() {
        let err = interpret_response(200, b"<html>").expect_err("not json");
        assert_eq!(err.status, 200);
    }

    #[test]
    fn only_unauthorized_errors_raise_the_alert() {
        let alert = UnauthorizedAlert::new();
        assert!(!report_unauthorized(&ApiError::new(500, "boom"), &alert, "expired"));
        assert!(report_unauthorized(&ApiError::unauthorized(), &alert, "expired"));
        assert!(!report_unauthorized(&ApiError::unauthorized(), &alert, "expired"));
    }
}
