//! Shared HTTP client, error types, and exit-code mapping for the CLI.

use std::fmt::{self, Display, Formatter};
use std::rc::Rc;
use std::time::Duration;

use anyhow::anyhow;
use plantwatch_api_models::ApiError;
use plantwatch_config::ClientConfig;
use plantwatch_ui::Session;
use plantwatch_ui::core::api::{Method, bearer, decode, interpret_response, join_url};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::state::FileStorage;

pub(crate) const HEADER_REQUEST_ID: &str = "x-request-id";

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

/// Map a normalised API error onto the CLI exit-code classes.
pub(crate) fn classify_api_error(error: &ApiError) -> CliError {
    if matches!(error.status, 400 | 409 | 422) {
        CliError::validation(error.message.clone())
    } else {
        CliError::failure(anyhow!(error.to_string()))
    }
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

const fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) session: Session,
}

impl AppContext {
    /// Build the HTTP client and hydrate the session from `state`.
    pub(crate) fn new(config: ClientConfig, state: FileStorage, trace_id: &str) -> CliResult<Self> {
        let base_url = parse_url(config.api_base()).map_err(CliError::validation)?;

        let mut default_headers = HeaderMap::new();
        let request_id = HeaderValue::from_str(trace_id).map_err(|_| {
            CliError::failure(anyhow!("trace identifier contains invalid characters"))
        })?;
        default_headers.insert(HEADER_REQUEST_ID, request_id);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url,
            session: Session::new(config, Rc::new(state)),
        })
    }

    /// Send one request and return the normalised JSON payload.
    pub(crate) async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> CliResult<Value> {
        let url = join_url(self.base_url.as_str(), path)
            .parse::<Url>()
            .map_err(|err| CliError::failure(anyhow!("invalid request URL for {path}: {err}")))?;

        let mut request = self
            .client
            .request(http_method(method), url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(value) = bearer(self.session.auth().token().as_deref()) {
            request = request.header(AUTHORIZATION, value);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, path, "api request");
        let response = request
            .send()
            .await
            .map_err(|err| CliError::failure(anyhow!("request to {path} failed: {err}")))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to read response from {path}: {err}")))?;

        interpret_response(status, &bytes).map_err(|err| self.reject(&err))
    }

    /// [`Self::send`] decoding the payload into `T`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> CliResult<T> {
        let value = self.send(method, path, body).await?;
        decode(200, value).map_err(|err| CliError::failure(anyhow!(err.message)))
    }

    fn reject(&self, error: &ApiError) -> CliError {
        if self.session.handle_api_error(error) {
            warn!(status = error.status, "session expired");
            eprintln!("{}", self.session.alert().snapshot().message);
        }
        classify_api_error(error)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use httpmock::MockServer;
    use std::path::Path;

    pub(crate) fn context_with(server: &MockServer, state_dir: &Path) -> AppContext {
        let config = ClientConfig {
            api_url: server.base_url(),
            ..ClientConfig::default()
        };
        AppContext::new(config, FileStorage::new(state_dir), "test-trace").expect("context")
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::context_with;
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn api_errors_map_to_exit_codes() {
        assert_eq!(classify_api_error(&ApiError::new(422, "bad code")).exit_code(), 2);
        assert_eq!(classify_api_error(&ApiError::new(409, "taken")).exit_code(), 2);
        assert_eq!(classify_api_error(&ApiError::unauthorized()).exit_code(), 3);
        let failure = classify_api_error(&ApiError::new(500, "boom"));
        assert_eq!(failure.exit_code(), 3);
        assert_eq!(failure.display_message(), "boom (status 500)");
    }

    #[tokio::test]
    async fn send_attaches_bearer_and_request_id() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/plants/4")
                .header("authorization", "Bearer tok")
                .header(HEADER_REQUEST_ID, "test-trace");
            then.status(200).json_body(json!({"data": {"id": 4}}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());
        ctx.session
            .complete_login(plantwatch_api_models::User::default(), "tok", &[]);

        let value = ctx.send(Method::Get, "plants/4", None).await.expect("send");
        assert_eq!(value["data"]["id"], 4);
        mock.assert();
    }

    #[tokio::test]
    async fn no_content_becomes_success() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/areas/3");
            then.status(204);
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());
        let value = ctx.send(Method::Delete, "areas/3", None).await.expect("send");
        assert_eq!(value, json!({"success": true}));
    }

    #[tokio::test]
    async fn error_body_description_becomes_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/plants");
            then.status(422)
                .json_body(json!({"response": {"description": "Code already exists"}}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());
        let err = ctx
            .send(Method::Post, "plants", Some(&json!({"code": "P1"})))
            .await
            .expect_err("validation");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "Code already exists");
    }

    #[tokio::test]
    async fn unauthorized_latches_the_alert_once() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/accounts");
            then.status(401).json_body(json!({"message": "expired"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, dir.path());

        for _ in 0..2 {
            let err = ctx.send(Method::Get, "accounts", None).await.expect_err("401");
            assert_eq!(err.exit_code(), 3);
            assert!(err.display_message().starts_with("Unauthorized"));
        }
        assert!(ctx.session.alert().is_latched());
        assert_eq!(
            ctx.session.alert().snapshot().message,
            ClientConfig::default().session_expired_message
        );
        mock.assert_hits(2);
    }
}
