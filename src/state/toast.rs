//! Transient notifications with timed dismissal.
//!
//! Each toast gets a fresh id and a removal task that fires after the
//! configured duration. Dismissing early is fine: the timer then finds
//! nothing to remove.

#[cfg(test)]
#[path = "toast_test.rs"]
mod toast_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use crate::config::DEFAULT_TOAST_SECS;

/// Display lifetime of a toast unless configured otherwise.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(DEFAULT_TOAST_SECS);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: Uuid,
    pub message: String,
    pub kind: ToastKind,
}

pub struct ToastQueue {
    toasts: Arc<watch::Sender<Vec<Toast>>>,
    duration: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_TOAST_DURATION)
    }

    #[must_use]
    pub fn with_duration(duration: Duration) -> Self {
        let (toasts, _) = watch::channel(Vec::new());
        Self { toasts: Arc::new(toasts), duration }
    }

    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.toasts.subscribe()
    }

    /// Append a toast and schedule its removal. Must run inside a Tokio runtime.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> Uuid {
        let toast = Toast { id: Uuid::new_v4(), message: message.into(), kind };
        let id = toast.id;
        tracing::debug!(%id, kind = kind.as_str(), message = %toast.message, "toast");
        self.toasts.send_modify(|toasts| toasts.push(toast));

        let toasts = Arc::clone(&self.toasts);
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            remove(&toasts, id);
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> Uuid {
        self.show(message, ToastKind::Error)
    }

    pub fn dismiss(&self, id: Uuid) {
        remove(&self.toasts, id);
    }
}

fn remove(toasts: &watch::Sender<Vec<Toast>>, id: Uuid) {
    toasts.send_if_modified(|toasts| {
        let before = toasts.len();
        toasts.retain(|toast| toast.id != id);
        toasts.len() != before
    });
}
