use super::*;
use crate::net::types::DEFAULT_SOURCES_COUNT;
use crate::test_helpers::{self, API_BASE, MockTransport};
use serde_json::json;
use std::sync::Arc;

fn store(transport: &Arc<MockTransport>) -> StatsStore {
    let (session, _) = test_helpers::signed_in(transport.clone(), "tok", test_helpers::plain_user());
    StatsStore::new(ApiClient::new(session, transport.clone(), API_BASE))
}

#[test]
fn defaults_before_first_fetch() {
    let store = store(&MockTransport::new());
    let stats = store.stats();
    assert_eq!(stats.sources_count, DEFAULT_SOURCES_COUNT);
    assert_eq!(stats.configured_channels, 0);
    assert_eq!(store.refresh_marker(), RefreshMarker::default());
}

#[tokio::test]
async fn fetch_replaces_whole_record() {
    let transport = MockTransport::new();
    transport.push_json(
        200,
        json!({ "sources_count": 25, "configured_channels": 2, "custom_sources": 12, "redis_enabled": true }),
    );
    let store = store(&transport);
    let rx = store.subscribe();

    assert!(store.fetch_stats().await);

    let stats = store.stats();
    assert_eq!(stats.sources_count, 25);
    assert_eq!(stats.configured_channels, 2);
    assert_eq!(stats.custom_sources, Some(12));
    assert!(stats.redis_enabled);
    assert!(rx.has_changed().unwrap());

    let request = transport.last_request();
    assert_eq!(request.url, format!("{API_BASE}/stats"));
    assert_eq!(request.headers.get("Authorization"), Some("Bearer tok"));
}

#[tokio::test]
async fn failed_fetch_keeps_previous_value() {
    let transport = MockTransport::new();
    transport.push_json(200, json!({ "sources_count": 30, "configured_channels": 4 }));
    transport.push_json(500, json!({ "detail": "boom" }));
    transport.push_error("offline");
    transport.push_raw(200, "not json");
    let store = store(&transport);

    assert!(store.fetch_stats().await);
    let before = store.stats();

    assert!(!store.fetch_stats().await);
    assert!(!store.fetch_stats().await);
    assert!(!store.fetch_stats().await);
    assert_eq!(store.stats(), before);
}

#[tokio::test]
async fn unauthorized_fetch_keeps_stats_but_clears_session() {
    let transport = MockTransport::new();
    transport.push_json(401, json!({}));
    let store = store(&transport);

    assert!(!store.fetch_stats().await);
    assert_eq!(store.stats(), AppStats::default());
    assert!(!store.api.session().is_authenticated());
}

#[test]
fn trigger_refresh_increments_and_stamps() {
    let store = store(&MockTransport::new());
    let rx = store.subscribe_refresh();

    store.trigger_refresh_at("09:41".to_owned());
    store.trigger_refresh_at("09:42".to_owned());

    let marker = store.refresh_marker();
    assert_eq!(marker.trigger, 2);
    assert_eq!(marker.last_update, "09:42");
    assert!(rx.has_changed().unwrap());
}

#[test]
fn trigger_refresh_makes_no_request() {
    let transport = MockTransport::new();
    let store = store(&transport);

    store.trigger_refresh();

    assert_eq!(store.refresh_marker().trigger, 1);
    assert_eq!(store.refresh_marker().last_update.len(), 5);
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn update_last_refresh_keeps_counter() {
    let store = store(&MockTransport::new());
    store.update_last_refresh();
    let marker = store.refresh_marker();
    assert_eq!(marker.trigger, 0);
    assert!(!marker.last_update.is_empty());
}
