//! Endpoint helpers for the admin views, all routed through [`ApiClient`].
//!
//! Each view group maps onto one backend router (`/config`, `/sources`,
//! `/rules`, `/history`, `/scheduler`, `/users`). Payloads stay as
//! `serde_json::Value`; the views render whatever the backend returns.
//!
//! ERROR HANDLING
//! ==============
//! Every helper returns the gateway's [`ApiError`] unchanged, so a 401 from
//! any of them has already torn the session down by the time it surfaces.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use reqwest::Method;
use serde_json::Value;
use urlencoding::encode;

use super::api::{ApiClient, RequestOptions};
use super::error::ApiError;
use super::types::User;

/// Default page size for `/history`, matching the backend default.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
/// Default retention window for `/history/cleanup`.
pub const DEFAULT_CLEANUP_DAYS: u32 = 30;

fn hot_endpoint(category: Option<&str>) -> String {
    match category {
        Some(category) => format!("/hot?category={}", encode(category)),
        None => "/hot".to_owned(),
    }
}

fn hot_source_endpoint(source_id: &str) -> String {
    format!("/hot/{}", encode(source_id))
}

fn custom_source_endpoint(id: &str) -> String {
    format!("/sources/custom/{}", encode(id))
}

fn history_endpoint(limit: u32, offset: u32) -> String {
    format!("/history?limit={limit}&offset={offset}")
}

fn cleanup_endpoint(days: u32) -> String {
    format!("/history/cleanup?days={days}")
}

fn push_channel_endpoint(channel: &str) -> String {
    format!("/config/push/{}", encode(channel))
}

fn push_test_endpoint(channel: &str) -> String {
    format!("{}/test", push_channel_endpoint(channel))
}

#[derive(Clone)]
pub struct AdminApi {
    api: ApiClient,
}

impl AdminApi {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    async fn post_empty(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.api.call(endpoint, RequestOptions::new(Method::POST)).await
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `GET /auth/me`; a successful answer replaces the session user.
    ///
    /// # Errors
    ///
    /// Gateway errors; `Parse` when the payload is not a user.
    pub async fn fetch_me(&self) -> Result<User, ApiError> {
        let user: User = self.api.call_as("/auth/me", RequestOptions::default()).await?;
        self.api.session().set_user(Some(user.clone()));
        Ok(user)
    }

    /// Best-effort `POST /auth/logout`, then the local logout. The backend
    /// holds no session state, so a failed call only gets logged.
    pub async fn remote_logout(&self) {
        if let Err(e) = self.post_empty("/auth/logout").await {
            tracing::warn!(error = %e, "remote logout failed");
        }
        self.api.session().logout();
    }

    // =========================================================================
    // HOT LIST
    // =========================================================================

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn hot_lists(&self, category: Option<&str>) -> Result<Value, ApiError> {
        self.api.get(&hot_endpoint(category)).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn hot_list(&self, source_id: &str) -> Result<Value, ApiError> {
        self.api.get(&hot_source_endpoint(source_id)).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn categories(&self) -> Result<Value, ApiError> {
        self.api.get("/categories").await
    }

    /// Ask the backend to refetch every source now.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn trigger_fetch(&self) -> Result<Value, ApiError> {
        self.post_empty("/fetch/trigger").await
    }

    // =========================================================================
    // SOURCES
    // =========================================================================

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn sources(&self) -> Result<Value, ApiError> {
        self.api.get("/sources").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn custom_sources(&self) -> Result<Value, ApiError> {
        self.api.get("/sources/custom").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn create_custom_source(&self, source: Value) -> Result<Value, ApiError> {
        self.api.post("/sources/custom", source).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_custom_source(&self, id: &str, source: Value) -> Result<Value, ApiError> {
        self.api.put(&custom_source_endpoint(id), source).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn delete_custom_source(&self, id: &str) -> Result<Value, ApiError> {
        self.api.delete(&custom_source_endpoint(id)).await
    }

    /// Dry-run a feed definition without saving it.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn validate_source(&self, source: Value) -> Result<Value, ApiError> {
        self.api.post("/sources/validate", source).await
    }

    // =========================================================================
    // PUSH CONFIG
    // =========================================================================

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn push_channels(&self) -> Result<Value, ApiError> {
        self.api.get("/config/push").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn push_channel(&self, channel: &str) -> Result<Value, ApiError> {
        self.api.get(&push_channel_endpoint(channel)).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_push_channel(&self, channel: &str, config: Value) -> Result<Value, ApiError> {
        self.api.put(&push_channel_endpoint(channel), config).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn delete_push_channel(&self, channel: &str) -> Result<Value, ApiError> {
        self.api.delete(&push_channel_endpoint(channel)).await
    }

    /// Send a test message through one configured channel.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn test_push_channel(&self, channel: &str) -> Result<Value, ApiError> {
        self.post_empty(&push_test_endpoint(channel)).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn settings(&self) -> Result<Value, ApiError> {
        self.api.get("/config/settings").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_settings(&self, settings: Value) -> Result<Value, ApiError> {
        self.api.put("/config/settings", settings).await
    }

    // =========================================================================
    // RULES
    // =========================================================================

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn rules(&self) -> Result<Value, ApiError> {
        self.api.get("/rules").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn rule_types(&self) -> Result<Value, ApiError> {
        self.api.get("/rules/types").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn create_rule(&self, rule: Value) -> Result<Value, ApiError> {
        self.api.post("/rules", rule).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_rule(&self, id: i64, rule: Value) -> Result<Value, ApiError> {
        self.api.put(&format!("/rules/{id}"), rule).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn delete_rule(&self, id: i64) -> Result<Value, ApiError> {
        self.api.delete(&format!("/rules/{id}")).await
    }

    // =========================================================================
    // HISTORY
    // =========================================================================

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn history(&self, limit: u32, offset: u32) -> Result<Value, ApiError> {
        self.api.get(&history_endpoint(limit, offset)).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn history_stats(&self) -> Result<Value, ApiError> {
        self.api.get("/history/stats").await
    }

    /// Delete records older than `days`.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn cleanup_history(&self, days: u32) -> Result<Value, ApiError> {
        self.api.delete(&cleanup_endpoint(days)).await
    }

    // =========================================================================
    // SCHEDULER
    // =========================================================================

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn scheduler_status(&self) -> Result<Value, ApiError> {
        self.api.get("/scheduler/status").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn trigger_scheduler(&self) -> Result<Value, ApiError> {
        self.post_empty("/scheduler/trigger").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn pause_scheduler(&self) -> Result<Value, ApiError> {
        self.post_empty("/scheduler/pause").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn resume_scheduler(&self) -> Result<Value, ApiError> {
        self.post_empty("/scheduler/resume").await
    }

    /// `{ fetch_interval?, enabled? }`; the backend bounds the interval to 1-1440 minutes.
    ///
    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_scheduler_config(&self, config: Value) -> Result<Value, ApiError> {
        self.api.put("/scheduler/config", config).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn digest_status(&self) -> Result<Value, ApiError> {
        self.api.get("/scheduler/digest").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_digest(&self, config: Value) -> Result<Value, ApiError> {
        self.api.put("/scheduler/digest", config).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn trigger_digest(&self) -> Result<Value, ApiError> {
        self.post_empty("/scheduler/digest/trigger").await
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn users(&self) -> Result<Value, ApiError> {
        self.api.get("/users").await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn user(&self, id: i64) -> Result<Value, ApiError> {
        self.api.get(&format!("/users/{id}")).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn update_user(&self, id: i64, update: Value) -> Result<Value, ApiError> {
        self.api.put(&format!("/users/{id}"), update).await
    }

    /// # Errors
    ///
    /// Gateway errors.
    pub async fn delete_user(&self, id: i64) -> Result<Value, ApiError> {
        self.api.delete(&format!("/users/{id}")).await
    }
}
