use super::*;

#[test]
fn user_role_admin_is_admin() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 1, "username": "root", "role": "admin"
    }))
    .unwrap();
    assert!(user.is_admin());
    assert_eq!(user.id, Some(1));
}

#[test]
fn user_other_role_is_not_admin() {
    let user: User = serde_json::from_value(serde_json::json!({ "username": "bob", "role": "user" })).unwrap();
    assert!(!user.is_admin());
}

#[test]
fn user_keeps_unknown_fields() {
    let user: User = serde_json::from_value(serde_json::json!({
        "id": 3, "username": "carol", "role": "user", "last_login": "2024-01-01"
    }))
    .unwrap();
    assert_eq!(user.extra.get("last_login").and_then(Value::as_str), Some("2024-01-01"));
}

#[test]
fn login_error_body_reads_as_unsuccessful() {
    let resp: LoginResponse = serde_json::from_str(r#"{"detail":"用户名或密码错误"}"#).unwrap();
    assert!(!resp.success);
    assert!(resp.token.is_none());
}

#[test]
fn auth_check_without_user() {
    let resp: AuthCheckResponse =
        serde_json::from_str(r#"{"authenticated":true,"auth_required":false,"auth_mode":"none"}"#).unwrap();
    assert!(resp.authenticated);
    assert!(resp.user.is_none());
    assert_eq!(resp.auth_mode.as_deref(), Some("none"));
}

#[test]
fn app_stats_default_counts_builtin_sources() {
    let stats = AppStats::default();
    assert_eq!(stats.sources_count, DEFAULT_SOURCES_COUNT);
    assert_eq!(stats.configured_channels, 0);
}

#[test]
fn app_stats_accepts_full_backend_payload() {
    let stats: AppStats = serde_json::from_value(serde_json::json!({
        "sources_count": 15,
        "builtin_sources": 13,
        "custom_sources": 2,
        "categories_count": 6,
        "configured_channels": 3,
        "redis_enabled": true,
        "redis_stats": { "hits": 10 }
    }))
    .unwrap();
    assert_eq!(stats.sources_count, 15);
    assert_eq!(stats.custom_sources, Some(2));
    assert!(stats.redis_enabled);
}

#[test]
fn app_stats_minimal_payload() {
    let stats: AppStats = serde_json::from_str(r#"{"sources_count":4,"configured_channels":1}"#).unwrap();
    assert_eq!(stats.sources_count, 4);
    assert_eq!(stats.builtin_sources, None);
}
