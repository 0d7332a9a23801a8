//! Application context: every store and the gateway, built once.
//!
//! SYSTEM CONTEXT
//! ==============
//! Construction order is fixed: storage, session, gateway, stats, router,
//! then the UI helpers. Each later piece takes handles to the earlier ones,
//! so there is no global lookup and no initialization-order hazard.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::sync::Arc;

use crate::config::ConsoleConfig;
use crate::net::admin::AdminApi;
use crate::net::api::ApiClient;
use crate::net::transport::{HttpTransport, ReqwestTransport, TransportError};
use crate::routes::{Navigation, Router};
use crate::state::confirm::ConfirmState;
use crate::state::session::SessionStore;
use crate::state::stats::StatsStore;
use crate::state::toast::ToastQueue;
use crate::state::ui::ThemeState;
use crate::storage::{FileStorage, Storage};

pub struct AppContext {
    pub config: ConsoleConfig,
    pub storage: Arc<dyn Storage>,
    pub session: Arc<SessionStore>,
    pub api: ApiClient,
    pub admin: AdminApi,
    pub stats: Arc<StatsStore>,
    pub router: Arc<Router>,
    pub toasts: Arc<ToastQueue>,
    pub confirm: Arc<ConfirmState>,
    pub theme: Arc<ThemeState>,
}

impl AppContext {
    /// File storage under `config.state_dir` and a reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig) -> Result<Self, TransportError> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(&config.state_dir));
        let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(config.timeouts)?);
        Ok(Self::with_parts(config, storage, transport))
    }

    #[must_use]
    pub fn with_parts(config: ConsoleConfig, storage: Arc<dyn Storage>, transport: Arc<dyn HttpTransport>) -> Self {
        let api_base = config.api_base();
        let session = Arc::new(SessionStore::new(Arc::clone(&storage), Arc::clone(&transport), api_base.clone()));
        let api = ApiClient::new(Arc::clone(&session), transport, api_base);
        let admin = AdminApi::new(api.clone());
        let stats = Arc::new(StatsStore::new(api.clone()));
        let router = Arc::new(Router::new());
        let toasts = Arc::new(ToastQueue::with_duration(config.toast_duration));
        let confirm = Arc::new(ConfirmState::new());
        let theme = Arc::new(ThemeState::new(Arc::clone(&storage)));
        tracing::debug!(api_base = api.api_base(), "app context ready");

        Self { config, storage, session, api, admin, stats, router, toasts, confirm, theme }
    }

    /// Startup sequence: verify a stored token, then load the counters.
    /// Returns whether the session is authenticated afterwards.
    pub async fn bootstrap(&self) -> bool {
        let authenticated = self.session.check_auth().await;
        self.stats.fetch_stats().await;
        self.stats.update_last_refresh();
        authenticated
    }

    /// Guarded navigation against this context's session.
    pub fn navigate(&self, path: &str) -> Navigation {
        self.router.navigate(path, &self.session)
    }
}
