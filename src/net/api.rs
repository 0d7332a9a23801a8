//! API gateway: the single chokepoint for authenticated backend calls.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every view-level request goes through [`ApiClient::call`]. The session's
//! auth headers form the base header set, caller headers override them, and
//! the response is reduced to either parsed JSON or one [`ApiError`].
//!
//! ERROR HANDLING
//! ==============
//! - 401: the session is logged out (global teardown), then `Unauthorized`.
//! - other non-2xx: the body is classified by [`ErrorBody`] into one message.
//! - 2xx with a non-JSON body: `Parse`, passed through unnormalized.
//!
//! Nothing is retried, deduplicated, or cancelled here.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{ApiError, ErrorBody};
use super::transport::{Headers, HttpRequest, HttpTransport};
use crate::state::session::SessionStore;

/// Caller-controlled parts of a request: method, extra headers, JSON body.
/// The endpoint passed to [`ApiClient::call`] carries path and query string.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Headers,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self { method: Method::GET, headers: Headers::new(), body: None }
    }
}

impl RequestOptions {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self { method, ..Self::default() }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    session: Arc<SessionStore>,
    transport: Arc<dyn HttpTransport>,
    api_base: String,
}

impl ApiClient {
    #[must_use]
    pub fn new(session: Arc<SessionStore>, transport: Arc<dyn HttpTransport>, api_base: impl Into<String>) -> Self {
        Self { session, transport, api_base: api_base.into() }
    }

    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Full URL for `endpoint` (`/rules?enabled=true` → `<base>/api/rules?enabled=true`).
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.api_base)
    }

    /// Issue `endpoint` with `options` and return the parsed JSON body.
    ///
    /// # Errors
    ///
    /// See the module docs: `Unauthorized` (session already cleared),
    /// `Request` with a normalized message, `Transport`, or `Parse`.
    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let mut headers = self.session.auth_headers();
        headers.merge(options.headers);

        let body = options
            .body
            .map(|value| serde_json::to_string(&value))
            .transpose()
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        let request = HttpRequest { method: options.method, url: self.url(endpoint), headers, body };
        tracing::debug!(method = %request.method, url = %request.url, "api call");

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if response.status == 401 {
            tracing::info!(endpoint, "401 from backend; clearing session");
            self.session.logout();
            return Err(ApiError::Unauthorized);
        }

        if !response.is_success() {
            let message = ErrorBody::parse(&response.body).message();
            tracing::debug!(endpoint, status = response.status, %message, "api call failed");
            return Err(ApiError::Request { status: response.status, message });
        }

        serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// [`ApiClient::call`] followed by deserialization into `T`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`], plus `Parse` when the JSON does not fit `T`.
    pub async fn call_as<T: DeserializeOwned>(&self, endpoint: &str, options: RequestOptions) -> Result<T, ApiError> {
        let value = self.call(endpoint, options).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// `GET endpoint`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`].
    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.call(endpoint, RequestOptions::new(Method::GET)).await
    }

    /// `POST endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`].
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.call(endpoint, RequestOptions::new(Method::POST).with_body(body)).await
    }

    /// `PUT endpoint` with a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`].
    pub async fn put(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        self.call(endpoint, RequestOptions::new(Method::PUT).with_body(body)).await
    }

    /// `DELETE endpoint`.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::call`].
    pub async fn delete(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.call(endpoint, RequestOptions::new(Method::DELETE)).await
    }
}
