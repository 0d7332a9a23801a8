//! Session store: bearer token, current user, and the auth handshake.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for authentication. The gateway reads
//! [`SessionStore::auth_headers`] for every call and tears the session down on
//! a 401; the router guard reads [`SessionStore::is_admin`] before every
//! navigation. Consumers observe changes through [`SessionStore::subscribe`].
//!
//! `login` and `check_auth` talk to the transport directly rather than through
//! the gateway: login interprets the payload's own `success` flag whatever
//! the status code, and a failed check must not double as a forced logout.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use reqwest::Method;
use tokio::sync::watch;

use crate::net::error::{ApiError, ErrorBody};
use crate::net::transport::{Headers, HttpRequest, HttpTransport};
use crate::net::types::{AuthCheckResponse, Credentials, LoginResponse, User};
use crate::storage::{Storage, TOKEN_KEY};

/// Shown when a failed login response carries no usable message.
pub const LOGIN_FAILED_MESSAGE: &str = "登录失败";
/// Shown when a failed registration response carries no usable message.
pub const REGISTER_FAILED_MESSAGE: &str = "注册失败";

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
const JSON_CONTENT_TYPE: &str = "application/json";

// =============================================================================
// SESSION
// =============================================================================

/// Token + user snapshot. Authenticated exactly when a user is present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    /// Bearer token; empty for an anonymous session.
    pub token: String,
    pub user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }

    /// Headers for an authenticated request: always a JSON content type,
    /// plus `Authorization: Bearer <token>` when a token is held.
    #[must_use]
    pub fn auth_headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE);
        if !self.token.is_empty() {
            headers.insert(AUTHORIZATION_HEADER, format!("Bearer {}", self.token));
        }
        headers
    }
}

/// Result of a login or registration attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Failure { message: String },
}

impl LoginOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

// =============================================================================
// SESSION STORE
// =============================================================================

pub struct SessionStore {
    state: watch::Sender<Session>,
    storage: Arc<dyn Storage>,
    transport: Arc<dyn HttpTransport>,
    api_base: String,
}

impl SessionStore {
    /// Restore the session from durable storage. A stored token starts the
    /// session unverified: no user until [`SessionStore::check_auth`] runs.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, transport: Arc<dyn HttpTransport>, api_base: impl Into<String>) -> Self {
        let token = storage.get_item(TOKEN_KEY).unwrap_or_default();
        let (state, _) = watch::channel(Session { token, user: None });
        Self { state, storage, transport, api_base: api_base.into() }
    }

    /// Current session snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified on every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn token(&self) -> String {
        self.state.borrow().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state.borrow().is_admin()
    }

    #[must_use]
    pub fn auth_headers(&self) -> Headers {
        self.state.borrow().auth_headers()
    }

    /// Store the token in memory and durable storage. An empty token removes
    /// the durable entry.
    pub fn set_token(&self, token: &str) {
        self.state.send_modify(|session| session.token = token.to_owned());
        let persisted = if token.is_empty() {
            self.storage.remove_item(TOKEN_KEY)
        } else {
            self.storage.set_item(TOKEN_KEY, token)
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "failed to persist session token");
        }
    }

    pub fn set_user(&self, user: Option<User>) {
        self.state.send_modify(|session| session.user = user);
    }

    /// Clear token and user. Local only; no server call.
    pub fn logout(&self) {
        self.set_token("");
        self.set_user(None);
    }

    /// Exchange credentials for a token via `POST /auth/login`.
    ///
    /// The payload's `success` flag decides the outcome regardless of status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] when no response arrives and
    /// [`ApiError::Parse`] when the body is not JSON.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        self.exchange_credentials("/auth/login", username, password, LOGIN_FAILED_MESSAGE)
            .await
    }

    /// Create a regular account via `POST /auth/register` and sign in with it.
    ///
    /// # Errors
    ///
    /// Same as [`SessionStore::login`].
    pub async fn register(&self, username: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        self.exchange_credentials("/auth/register", username, password, REGISTER_FAILED_MESSAGE)
            .await
    }

    async fn exchange_credentials(
        &self,
        endpoint: &str,
        username: &str,
        password: &str,
        fallback: &str,
    ) -> Result<LoginOutcome, ApiError> {
        let body = serde_json::to_string(&Credentials { username, password })
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let headers: Headers = [(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)].into_iter().collect();
        let request = HttpRequest {
            method: Method::POST,
            url: format!("{}{endpoint}", self.api_base),
            headers,
            body: Some(body),
        };

        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let value: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))?;
        let success = value.get("success").and_then(serde_json::Value::as_bool).unwrap_or(false);

        if success {
            // An accepted login whose payload does not fit is an error, not a rejection.
            let parsed: LoginResponse = serde_json::from_value(value).map_err(|e| {
                tracing::warn!(endpoint, error = %e, "sign-in response did not parse");
                ApiError::Parse(e.to_string())
            })?;
            self.set_token(parsed.token.as_deref().unwrap_or_default());
            self.set_user(parsed.user);
            tracing::info!(endpoint, "signed in");
            return Ok(LoginOutcome::Success);
        }

        let message = ErrorBody::from_value(value).message_or(fallback);
        tracing::info!(endpoint, status = response.status, %message, "sign-in rejected");
        Ok(LoginOutcome::Failure { message })
    }

    /// Verify the held token via `GET /auth/check`.
    ///
    /// Without a token this reports `false` immediately. Any failure
    /// (transport, parse, `authenticated: false`) clears the user and reports
    /// `false`; failures are logged, never propagated.
    pub async fn check_auth(&self) -> bool {
        if self.token().is_empty() {
            self.set_user(None);
            return false;
        }

        match self.fetch_auth_check().await {
            Ok(check) if check.authenticated => {
                self.set_user(check.user);
                return true;
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "auth check failed"),
        }

        self.set_user(None);
        false
    }

    async fn fetch_auth_check(&self) -> Result<AuthCheckResponse, ApiError> {
        let request = HttpRequest {
            method: Method::GET,
            url: format!("{}/auth/check", self.api_base),
            headers: self.auth_headers(),
            body: None,
        };
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
