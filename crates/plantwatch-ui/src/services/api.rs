//! REST client over `fetch`.
//!
//! Every call attaches the session bearer token, normalises the response via
//! [`interpret_response`], and raises the session-expired alert on 401. The
//! `*_loader` variants also hold the loading indicator while in flight.

use std::rc::Rc;

use gloo_net::http::Request;
use plantwatch_api_models::endpoints::{self, assets_outlook_path, list_path, record_path};
use plantwatch_api_models::{
    ApiError, ApiResponse, AssetFilter, AssetOutlookDto, ComponentSummary,
    ComponentSummaryRequest, LoginRequest, LoginResponse, PaginateData, PaginateRequest,
    PaginateResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::api::{Method, bearer, decode, interpret_response, join_url};
use crate::core::outlook::{AssetOutlookState, component_ids, merge_summaries};
use crate::core::session::{LoginOutcome, Session};

fn transport(err: &gloo_net::Error) -> ApiError {
    ApiError::new(0, format!("request failed: {err}"))
}

/// Client bound to one session.
#[derive(Debug, Clone)]
pub struct ApiClient {
    session: Rc<Session>,
}

impl ApiClient {
    /// Client using `session` for its base URL, token, and alert.
    #[must_use]
    pub const fn new(session: Rc<Session>) -> Self {
        Self { session }
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = join_url(self.session.config().api_base(), path);
        let mut req = match method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        };
        req = req.header("Content-Type", "application/json");
        if let Some(value) = bearer(self.session.auth().token().as_deref()) {
            req = req.header("Authorization", &value);
        }
        if let Some(body) = body {
            req = req.json(&body).map_err(|err| transport(&err))?;
        }
        debug!(%method, path, "api request");
        let response = req.send().await.map_err(|err| transport(&err))?;
        let status = response.status();
        let bytes = response.binary().await.map_err(|err| transport(&err))?;
        interpret_response(status, &bytes).map_err(|err| {
            if self.session.handle_api_error(&err) {
                warn!(path, "session expired");
            }
            err
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let value = self.send(method, path, body).await?;
        decode(200, value)
    }

    async fn call_loader<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let _busy = self.session.loading().begin();
        self.call(method, path, body).await
    }

    fn encode<B: Serialize>(body: &B) -> Result<Value, ApiError> {
        serde_json::to_value(body).map_err(|err| ApiError::new(0, format!("invalid request body: {err}")))
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on transport or HTTP failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(Method::Get, path, None).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on transport or HTTP failure.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.call(Method::Post, path, Some(Self::encode(body)?)).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on transport or HTTP failure.
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.call(Method::Put, path, Some(Self::encode(body)?)).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on transport or HTTP failure.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.call(Method::Patch, path, Some(Self::encode(body)?)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on transport or HTTP failure.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call(Method::Delete, path, None).await
    }

    /// [`Self::get`] while showing the loading indicator.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get`].
    pub async fn get_loader<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call_loader(Method::Get, path, None).await
    }

    /// [`Self::post`] while showing the loading indicator.
    ///
    /// # Errors
    ///
    /// Same as [`Self::post`].
    pub async fn post_loader<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.call_loader(Method::Post, path, Some(Self::encode(body)?)).await
    }

    /// [`Self::put`] while showing the loading indicator.
    ///
    /// # Errors
    ///
    /// Same as [`Self::put`].
    pub async fn put_loader<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.call_loader(Method::Put, path, Some(Self::encode(body)?)).await
    }

    /// [`Self::patch`] while showing the loading indicator.
    ///
    /// # Errors
    ///
    /// Same as [`Self::patch`].
    pub async fn patch_loader<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.call_loader(Method::Patch, path, Some(Self::encode(body)?)).await
    }

    /// [`Self::delete`] while showing the loading indicator.
    ///
    /// # Errors
    ///
    /// Same as [`Self::delete`].
    pub async fn delete_loader<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.call_loader(Method::Delete, path, None).await
    }

    /// Sign in and apply the result to the session.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on HTTP failure or when the server grants a
    /// session without a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: ApiResponse<LoginResponse> = self.post_loader(endpoints::LOGIN, &request).await?;
        self.session
            .apply_login(response.data)
            .map_err(|err| ApiError::new(0, err.to_string()))
    }

    /// One page of `resource`, filtered by the request.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on failure.
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        request: &PaginateRequest,
    ) -> Result<PaginateResponse<T>, ApiError> {
        let response: ApiResponse<PaginateData<T>> =
            self.get_loader(&list_path(resource, request)).await?;
        Ok(PaginateResponse::from_data(response.data, request))
    }

    /// One record of `resource`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on failure.
    pub async fn fetch<T: DeserializeOwned>(&self, resource: &str, id: i64) -> Result<T, ApiError> {
        let response: ApiResponse<T> = self.get_loader(&record_path(resource, id)).await?;
        Ok(response.data)
    }

    /// Summary flags for `ids`.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on failure.
    pub async fn component_summaries(&self, ids: Vec<i64>) -> Result<Vec<ComponentSummary>, ApiError> {
        let request = ComponentSummaryRequest { component_ids: ids };
        let response: ApiResponse<Vec<ComponentSummary>> =
            self.post_loader(endpoints::COMPONENT_SUMMARY, &request).await?;
        Ok(response.data)
    }

    /// One page of the asset outlook.
    ///
    /// # Errors
    ///
    /// Returns the normalised [`ApiError`] on failure.
    pub async fn assets_outlook(
        &self,
        page: u32,
        page_size: u32,
        filter: &AssetFilter,
    ) -> Result<PaginateData<AssetOutlookDto>, ApiError> {
        let response: ApiResponse<PaginateData<AssetOutlookDto>> = self
            .get_loader(&assets_outlook_path(page, page_size, filter))
            .await?;
        Ok(response.data)
    }

    /// Reload the outlook page described by `state`, then merge summary flags.
    ///
    /// A failed summary request leaves the page loaded without flags.
    pub async fn load_outlook(&self, state: &mut AssetOutlookState) {
        state.begin_load();
        match self
            .assets_outlook(state.page, state.page_size, &state.filters)
            .await
        {
            Ok(data) => {
                let total = (data.total > 0).then_some(data.total);
                state.apply_page(data, total);
            }
            Err(err) => {
                state.apply_error(Some(err.message));
                return;
            }
        }
        let ids = component_ids(&state.items);
        if ids.is_empty() {
            return;
        }
        match self.component_summaries(ids).await {
            Ok(summaries) => merge_summaries(&mut state.items, &summaries),
            Err(err) => warn!(error = %err, "component summaries unavailable"),
        }
    }
}
