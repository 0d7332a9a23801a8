use super::*;
use crate::net::error::{REQUEST_FAILED_MESSAGE, REQUIRED_FIELD_NOTICE, TOO_SHORT_NOTICE};
use crate::storage::{Storage, TOKEN_KEY};
use crate::test_helpers::{self, API_BASE, MockTransport};
use serde_json::json;

fn client_for(transport: &Arc<MockTransport>, token: &str) -> (ApiClient, Arc<crate::storage::MemoryStorage>) {
    let (session, storage) = test_helpers::signed_in(transport.clone(), token, test_helpers::admin_user());
    (ApiClient::new(session, transport.clone(), API_BASE), storage)
}

// =============================================================
// Request composition
// =============================================================

#[tokio::test]
async fn call_prefixes_endpoint_and_attaches_auth_headers() {
    let transport = MockTransport::new();
    transport.push_json(200, json!([{ "id": 1 }]));
    let (client, _) = client_for(&transport, "tok");

    let value = client.get("/rules?enabled=true").await.unwrap();

    assert_eq!(value, json!([{ "id": 1 }]));
    let request = transport.last_request();
    assert_eq!(request.url, format!("{API_BASE}/rules?enabled=true"));
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.headers.get("Authorization"), Some("Bearer tok"));
    assert_eq!(request.headers.get("Content-Type"), Some("application/json"));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn caller_headers_override_auth_headers() {
    let transport = MockTransport::new();
    transport.push_json(200, json!({}));
    let (client, _) = client_for(&transport, "tok");

    let options = RequestOptions::new(Method::POST)
        .with_header("authorization", "Bearer other")
        .with_header("X-Trace", "1")
        .with_body(json!({ "a": 1 }));
    client.call("/fetch/trigger", options).await.unwrap();

    let request = transport.last_request();
    assert_eq!(request.headers.get("Authorization"), Some("Bearer other"));
    assert_eq!(request.headers.get("X-Trace"), Some("1"));
    assert_eq!(request.headers.len(), 3);
    assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
}

#[tokio::test]
async fn anonymous_call_has_no_authorization() {
    let transport = MockTransport::new();
    transport.push_json(200, json!({ "sources": [] }));
    let (session, _) = test_helpers::session_store(transport.clone(), None);
    let client = ApiClient::new(session, transport.clone(), API_BASE);

    client.get("/sources").await.unwrap();
    assert!(!transport.last_request().headers.contains("Authorization"));
}

// =============================================================
// 401 teardown
// =============================================================

#[tokio::test]
async fn unauthorized_clears_session_from_any_endpoint() {
    for endpoint in ["/rules", "/users/3", "/scheduler/status", "/stats"] {
        let transport = MockTransport::new();
        transport.push_json(401, json!({ "detail": "token expired" }));
        let (client, storage) = client_for(&transport, "tok");

        let err = client.get(endpoint).await.unwrap_err();

        assert_eq!(err, ApiError::Unauthorized);
        assert_eq!(err.message(), "Unauthorized");
        assert_eq!(client.session().token(), "", "{endpoint}");
        assert!(client.session().user().is_none(), "{endpoint}");
        assert_eq!(storage.get_item(TOKEN_KEY), None, "{endpoint}");
    }
}

#[tokio::test]
async fn other_errors_leave_session_intact() {
    let transport = MockTransport::new();
    transport.push_json(403, json!({ "detail": "需要管理员权限" }));
    let (client, _) = client_for(&transport, "tok");

    let err = client.get("/users").await.unwrap_err();

    assert_eq!(err, ApiError::Request { status: 403, message: "需要管理员权限".to_owned() });
    assert_eq!(client.session().token(), "tok");
    assert!(client.session().is_admin());
}

// =============================================================
// Error normalization
// =============================================================

#[tokio::test]
async fn validation_prefix_is_stripped_and_localized() {
    let transport = MockTransport::new();
    transport.push_json(422, json!({ "detail": [{ "msg": "Value error, Field required" }] }));
    let (client, _) = client_for(&transport, "tok");

    let err = client.post("/rules", json!({})).await.unwrap_err();
    assert_eq!(err.message(), REQUIRED_FIELD_NOTICE);
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn too_short_notice_ignores_threshold() {
    let transport = MockTransport::new();
    transport.push_json(422, json!({ "detail": [{ "msg": "String should have at least 5 characters" }] }));
    let (client, _) = client_for(&transport, "tok");

    let err = client.put("/users/2", json!({ "password": "abc" })).await.unwrap_err();
    assert_eq!(err.message(), TOO_SHORT_NOTICE);
}

#[tokio::test]
async fn string_detail_is_verbatim() {
    let transport = MockTransport::new();
    transport.push_json(400, json!({ "detail": "custom message" }));
    let (client, _) = client_for(&transport, "tok");

    assert_eq!(client.delete("/rules/1").await.unwrap_err().message(), "custom message");
}

#[tokio::test]
async fn empty_error_body_is_request_failed() {
    let transport = MockTransport::new();
    transport.push_json(500, json!({}));
    let (client, _) = client_for(&transport, "tok");

    assert_eq!(client.get("/history").await.unwrap_err().message(), REQUEST_FAILED_MESSAGE);
}

#[tokio::test]
async fn non_json_error_body_is_request_failed() {
    let transport = MockTransport::new();
    transport.push_raw(502, "Bad Gateway");
    let (client, _) = client_for(&transport, "tok");

    let err = client.get("/history").await.unwrap_err();
    assert_eq!(err, ApiError::Request { status: 502, message: REQUEST_FAILED_MESSAGE.to_owned() });
}

// =============================================================
// Success / transport paths
// =============================================================

#[tokio::test]
async fn non_json_success_body_is_parse_error() {
    let transport = MockTransport::new();
    transport.push_raw(200, "ok");
    let (client, _) = client_for(&transport, "tok");

    assert!(matches!(client.get("/hot").await, Err(ApiError::Parse(_))));
}

#[tokio::test]
async fn transport_failure_surfaces_as_is() {
    let transport = MockTransport::new();
    transport.push_error("connection refused");
    let (client, _) = client_for(&transport, "tok");

    let err = client.get("/hot").await.unwrap_err();
    assert_eq!(err.message(), "connection refused");
    assert_eq!(client.session().token(), "tok");
}

#[tokio::test]
async fn call_as_deserializes_typed_payload() {
    let transport = MockTransport::new();
    transport.push_json(200, json!({ "sources_count": 20, "configured_channels": 2 }));
    let (client, _) = client_for(&transport, "tok");

    let stats: crate::net::types::AppStats = client.call_as("/stats", RequestOptions::default()).await.unwrap();
    assert_eq!(stats.sources_count, 20);
}

#[tokio::test]
async fn call_as_shape_mismatch_is_parse_error() {
    let transport = MockTransport::new();
    transport.push_json(200, json!({ "unexpected": true }));
    let (client, _) = client_for(&transport, "tok");

    let result: Result<crate::net::types::AppStats, _> = client.call_as("/stats", RequestOptions::default()).await;
    assert!(matches!(result, Err(ApiError::Parse(_))));
}
