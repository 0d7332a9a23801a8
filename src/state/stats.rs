//! Dashboard counters and the manual-refresh marker.
//!
//! SYSTEM CONTEXT
//! ==============
//! The header shows `sources_count` / `configured_channels` and a "last
//! updated" clock. Views bump the refresh marker to ask their children to
//! reload; the marker itself never fetches anything.
//!
//! ERROR HANDLING
//! ==============
//! `fetch_stats` keeps the previous value on failure (stale-but-present) and
//! logs the reason. A 401 still goes through the gateway, so the session is
//! cleared even though the error is absorbed here.

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use tokio::sync::watch;

use crate::net::api::{ApiClient, RequestOptions};
use crate::net::types::AppStats;
use crate::util::clock;

/// Monotonic refresh counter plus the local `HH:MM` of the last bump.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshMarker {
    pub trigger: u64,
    /// Empty until the first refresh.
    pub last_update: String,
}

pub struct StatsStore {
    api: ApiClient,
    stats: watch::Sender<AppStats>,
    refresh: watch::Sender<RefreshMarker>,
}

impl StatsStore {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (stats, _) = watch::channel(AppStats::default());
        let (refresh, _) = watch::channel(RefreshMarker::default());
        Self { api, stats, refresh }
    }

    #[must_use]
    pub fn stats(&self) -> AppStats {
        self.stats.borrow().clone()
    }

    #[must_use]
    pub fn refresh_marker(&self) -> RefreshMarker {
        self.refresh.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppStats> {
        self.stats.subscribe()
    }

    #[must_use]
    pub fn subscribe_refresh(&self) -> watch::Receiver<RefreshMarker> {
        self.refresh.subscribe()
    }

    /// Replace the counters from `GET /stats`. Returns whether the fetch
    /// landed; on failure the old counters stay.
    pub async fn fetch_stats(&self) -> bool {
        match self.api.call_as::<AppStats>("/stats", RequestOptions::default()).await {
            Ok(stats) => {
                tracing::debug!(sources = stats.sources_count, channels = stats.configured_channels, "stats refreshed");
                self.stats.send_replace(stats);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch stats");
                false
            }
        }
    }

    /// Bump the refresh counter and stamp the current local time.
    pub fn trigger_refresh(&self) {
        self.trigger_refresh_at(clock::local_hour_minute());
    }

    /// Stamp the current local time without bumping the counter.
    pub fn update_last_refresh(&self) {
        let now = clock::local_hour_minute();
        self.refresh.send_modify(|marker| marker.last_update = now);
    }

    fn trigger_refresh_at(&self, stamp: String) {
        self.refresh.send_modify(|marker| {
            marker.trigger += 1;
            marker.last_update = stamp;
        });
    }
}
