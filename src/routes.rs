//! Route table and navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Seven views, five of them admin-only. The guard reads the session's admin
//! flag before every navigation and sends non-admins back to the hot list.
//! A view's data is fetched only once navigation lands on it
//! ([`View::load`]).
//!
//! DESIGN
//! ======
//! The table is a `static` slice; nothing mutates it. [`guard`] is a pure
//! function of (path, admin flag) so it can be tested without a session;
//! [`Router`] wraps it and publishes the landed route.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use serde_json::Value;
use tokio::sync::watch;

use crate::net::admin::{AdminApi, DEFAULT_HISTORY_LIMIT};
use crate::net::error::ApiError;
use crate::state::session::SessionStore;

/// Landing route and fallback for rejected admin navigation.
pub const HOME_PATH: &str = "/hotlist";

// =============================================================================
// VIEWS
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    HotList,
    DataSources,
    PushConfig,
    PushRules,
    PushHistory,
    Scheduler,
    UserManagement,
}

impl View {
    /// Fetch the data this view renders.
    ///
    /// # Errors
    ///
    /// Gateway errors from the underlying call.
    pub async fn load(self, api: &AdminApi) -> Result<Value, ApiError> {
        match self {
            Self::HotList => api.hot_lists(None).await,
            Self::DataSources => api.sources().await,
            Self::PushConfig => api.push_channels().await,
            Self::PushRules => api.rules().await,
            Self::PushHistory => api.history(DEFAULT_HISTORY_LIMIT, 0).await,
            Self::Scheduler => api.scheduler_status().await,
            Self::UserManagement => api.users().await,
        }
    }
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Font Awesome class list.
    pub icon: &'static str,
    pub admin_only: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    pub meta: RouteMeta,
}

const fn route(
    path: &'static str,
    name: &'static str,
    view: View,
    title: &'static str,
    subtitle: &'static str,
    icon: &'static str,
    admin_only: bool,
) -> RouteDescriptor {
    RouteDescriptor { path, name, view, meta: RouteMeta { title, subtitle, icon, admin_only } }
}

pub static ROUTES: [RouteDescriptor; 7] = [
    route("/hotlist", "hotlist", View::HotList, "热搜榜", "实时聚合全网热点资讯", "fas fa-fire", false),
    route("/sources", "sources", View::DataSources, "数据源", "查看数据源", "fas fa-rss", false),
    route("/push", "push", View::PushConfig, "推送配置", "配置推送渠道", "fas fa-paper-plane", true),
    route("/rules", "rules", View::PushRules, "推送规则", "配置推送规则", "fas fa-filter", true),
    route("/history", "history", View::PushHistory, "推送历史", "查看推送记录", "fas fa-history", true),
    route("/scheduler", "scheduler", View::Scheduler, "定时任务", "管理定时任务", "fas fa-clock", true),
    route("/users", "users", View::UserManagement, "用户管理", "管理系统用户", "fas fa-users-cog", true),
];

/// The hot-list route. Always present in [`ROUTES`].
#[must_use]
pub fn home() -> &'static RouteDescriptor {
    &ROUTES[0]
}

/// Look up a route by exact path, ignoring a query string and a trailing slash.
#[must_use]
pub fn find(path: &str) -> Option<&'static RouteDescriptor> {
    let path = normalize(path);
    ROUTES.iter().find(|route| route.path == path)
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

// =============================================================================
// GUARD
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Land on the requested route.
    Proceed(&'static RouteDescriptor),
    /// Land on a different route instead (root alias or admin rejection).
    Redirect(&'static RouteDescriptor),
    NotFound,
}

impl Navigation {
    /// Route the navigation ends on, if any.
    #[must_use]
    pub fn target(self) -> Option<&'static RouteDescriptor> {
        match self {
            Self::Proceed(route) | Self::Redirect(route) => Some(route),
            Self::NotFound => None,
        }
    }
}

/// Decide where a navigation to `path` ends for a user with `is_admin`.
#[must_use]
pub fn guard(path: &str, is_admin: bool) -> Navigation {
    if normalize(path) == "/" {
        return Navigation::Redirect(home());
    }
    match find(path) {
        None => Navigation::NotFound,
        Some(route) if route.meta.admin_only && !is_admin => Navigation::Redirect(home()),
        Some(route) => Navigation::Proceed(route),
    }
}

// =============================================================================
// ROUTER
// =============================================================================

pub struct Router {
    current: watch::Sender<&'static RouteDescriptor>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Start on the hot list.
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(home());
        Self { current }
    }

    #[must_use]
    pub fn current(&self) -> &'static RouteDescriptor {
        *self.current.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<&'static RouteDescriptor> {
        self.current.subscribe()
    }

    /// Run the guard against the session and record where navigation landed.
    /// `NotFound` leaves the current route untouched.
    pub fn navigate(&self, path: &str, session: &SessionStore) -> Navigation {
        let outcome = guard(path, session.is_admin());
        match outcome {
            Navigation::Redirect(route) => {
                tracing::info!(requested = path, landed = route.path, "navigation redirected");
                self.current.send_replace(route);
            }
            Navigation::Proceed(route) => {
                self.current.send_replace(route);
            }
            Navigation::NotFound => tracing::debug!(requested = path, "no such route"),
        }
        outcome
    }
}
