//! Wire DTOs for the hotpush backend's auth and stats endpoints.
//!
//! DESIGN
//! ======
//! Fields the backend may omit are `#[serde(default)]` so older and newer
//! server revisions both deserialize. Unknown user fields are kept in
//! `User::extra` instead of being dropped.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role string the backend assigns to administrators.
pub const ADMIN_ROLE: &str = "admin";

/// Number of built-in hot-list sources shown before the first stats fetch.
pub const DEFAULT_SOURCES_COUNT: u64 = 13;

/// The signed-in user as reported by `/auth/login`, `/auth/check` or `/auth/me`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub role: String,
    /// Any additional fields the backend attaches.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Body of `POST /auth/login` and `POST /auth/register`.
#[derive(Clone, Debug, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Response of `POST /auth/login`. Error responses reuse the same shape with
/// `success` absent.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Response of `GET /auth/check`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthCheckResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub auth_required: Option<bool>,
    /// `"none"`, `"password"` or `"user"`.
    #[serde(default)]
    pub auth_mode: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Dashboard counters from `GET /stats`. Replaced wholesale on every fetch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStats {
    pub sources_count: u64,
    pub configured_channels: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builtin_sources: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_sources: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories_count: Option<u64>,
    #[serde(default)]
    pub redis_enabled: bool,
}

impl Default for AppStats {
    fn default() -> Self {
        Self {
            sources_count: DEFAULT_SOURCES_COUNT,
            configured_channels: 0,
            builtin_sources: None,
            custom_sources: None,
            categories_count: None,
            redis_enabled: false,
        }
    }
}
