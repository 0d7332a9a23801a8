use super::*;
use crate::config::ConsoleConfig;

#[test]
fn default_duration_matches_config_default() {
    assert_eq!(DEFAULT_TOAST_DURATION, ConsoleConfig::default().toast_duration);
}

#[tokio::test(start_paused = true)]
async fn toast_expires_after_duration() {
    let queue = ToastQueue::new();
    let id = queue.show("已保存", ToastKind::Success);

    assert_eq!(queue.toasts().len(), 1);
    assert_eq!(queue.toasts()[0].id, id);

    tokio::time::sleep(Duration::from_millis(2_900)).await;
    assert_eq!(queue.toasts().len(), 1);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(queue.toasts().is_empty());
}

#[tokio::test(start_paused = true)]
async fn toasts_keep_insertion_order_and_expire_independently() {
    let queue = ToastQueue::with_duration(Duration::from_secs(1));
    let first = queue.show("first", ToastKind::Info);
    tokio::time::sleep(Duration::from_millis(500)).await;
    let second = queue.error("second");

    let ids: Vec<Uuid> = queue.toasts().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![first, second]);

    tokio::time::sleep(Duration::from_millis(600)).await;
    let remaining = queue.toasts();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].kind, ToastKind::Error);
}

#[tokio::test(start_paused = true)]
async fn dismiss_removes_early_and_timer_is_harmless() {
    let queue = ToastQueue::new();
    let mut rx = queue.subscribe();
    let id = queue.success("done");
    let _ = rx.borrow_and_update();

    queue.dismiss(id);
    assert!(queue.toasts().is_empty());
    assert!(rx.has_changed().unwrap());
    let _ = rx.borrow_and_update();

    tokio::time::sleep(DEFAULT_TOAST_DURATION * 2).await;
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn kind_labels() {
    assert_eq!(ToastKind::default().as_str(), "info");
    assert_eq!(ToastKind::Warning.as_str(), "warning");
}
