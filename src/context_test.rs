use super::*;
use crate::storage::{MemoryStorage, TOKEN_KEY};
use crate::test_helpers::MockTransport;
use serde_json::json;

fn context(transport: &Arc<MockTransport>, storage: Arc<MemoryStorage>) -> AppContext {
    let config = ConsoleConfig { base_url: "http://backend.test".to_owned(), ..ConsoleConfig::default() };
    AppContext::with_parts(config, storage, transport.clone())
}

#[test]
fn stores_share_one_session() {
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item(TOKEN_KEY, "persisted").unwrap();
    let ctx = context(&MockTransport::new(), storage);

    assert_eq!(ctx.session.token(), "persisted");
    assert!(Arc::ptr_eq(ctx.api.session(), &ctx.session));
    assert_eq!(ctx.api.api_base(), "http://backend.test/api");
}

#[tokio::test]
async fn gateway_401_is_visible_to_guard() {
    let transport = MockTransport::new();
    let ctx = context(&transport, Arc::new(MemoryStorage::new()));
    ctx.session.set_token("tok");
    ctx.session.set_user(Some(crate::test_helpers::admin_user()));
    assert!(matches!(ctx.navigate("/users"), Navigation::Proceed(_)));

    transport.push_json(401, json!({}));
    assert!(ctx.admin.users().await.is_err());

    assert!(matches!(ctx.navigate("/users"), Navigation::Redirect(_)));
}

#[tokio::test]
async fn bootstrap_checks_session_then_loads_stats() {
    let transport = MockTransport::new();
    transport.push_json(200, json!({ "authenticated": true, "user": { "id": 2, "username": "reader", "role": "user" } }));
    transport.push_json(200, json!({ "sources_count": 40, "configured_channels": 1 }));
    let storage = Arc::new(MemoryStorage::new());
    storage.set_item(TOKEN_KEY, "tok").unwrap();
    let ctx = context(&transport, storage);

    assert!(ctx.bootstrap().await);

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec!["http://backend.test/api/auth/check", "http://backend.test/api/stats"]);
    assert_eq!(ctx.stats.stats().sources_count, 40);
    assert!(!ctx.stats.refresh_marker().last_update.is_empty());
    assert!(!ctx.session.is_admin());
}

#[tokio::test]
async fn bootstrap_anonymous_still_loads_stats() {
    let transport = MockTransport::new();
    transport.push_json(200, json!({ "sources_count": 13, "configured_channels": 0 }));
    let ctx = context(&transport, Arc::new(MemoryStorage::new()));

    assert!(!ctx.bootstrap().await);
    assert_eq!(transport.request_count(), 1);
}

#[test]
fn theme_reads_shared_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let ctx = context(&MockTransport::new(), storage.clone());
    ctx.theme.toggle();
    assert_eq!(storage.get_item(crate::storage::DARK_MODE_KEY).as_deref(), Some("true"));
}
