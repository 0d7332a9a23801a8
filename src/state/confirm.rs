//! Single modal confirmation prompt.
//!
//! DESIGN
//! ======
//! `confirm` publishes the dialog through a watch channel and parks on a
//! oneshot until `handle_confirm` / `handle_cancel` answers it. Only one
//! prompt is live at a time: opening a new one drops the previous sender,
//! so the superseded caller resolves `false`.

#[cfg(test)]
#[path = "confirm_test.rs"]
mod confirm_test;

use std::sync::{Mutex, PoisonError};

use tokio::sync::{oneshot, watch};

pub const DEFAULT_CONFIRM_TITLE: &str = "确认操作";
pub const DEFAULT_CONFIRM_MESSAGE: &str = "确定要执行此操作吗？";
pub const DEFAULT_CONFIRM_TEXT: &str = "确定";
pub const DEFAULT_CANCEL_TEXT: &str = "取消";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfirmKind {
    #[default]
    Warning,
    Danger,
    Info,
}

/// Per-prompt overrides; unset fields fall back to the defaults above.
#[derive(Clone, Debug, Default)]
pub struct ConfirmOptions {
    pub title: Option<String>,
    pub kind: Option<ConfirmKind>,
    pub confirm_text: Option<String>,
    pub cancel_text: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub visible: bool,
    pub title: String,
    pub message: String,
    pub kind: ConfirmKind,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl Default for ConfirmDialog {
    fn default() -> Self {
        Self {
            visible: false,
            title: DEFAULT_CONFIRM_TITLE.to_owned(),
            message: DEFAULT_CONFIRM_MESSAGE.to_owned(),
            kind: ConfirmKind::Warning,
            confirm_text: DEFAULT_CONFIRM_TEXT.to_owned(),
            cancel_text: DEFAULT_CANCEL_TEXT.to_owned(),
        }
    }
}

pub struct ConfirmState {
    dialog: watch::Sender<ConfirmDialog>,
    pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl Default for ConfirmState {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmState {
    #[must_use]
    pub fn new() -> Self {
        let (dialog, _) = watch::channel(ConfirmDialog::default());
        Self { dialog, pending: Mutex::new(None) }
    }

    #[must_use]
    pub fn dialog(&self) -> ConfirmDialog {
        self.dialog.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ConfirmDialog> {
        self.dialog.subscribe()
    }

    /// Show the prompt and wait for an answer. `false` on cancel or when a
    /// newer prompt replaces this one.
    pub async fn confirm(&self, message: impl Into<String>, options: ConfirmOptions) -> bool {
        let (tx, rx) = oneshot::channel();
        let dialog = ConfirmDialog {
            visible: true,
            title: options.title.unwrap_or_else(|| DEFAULT_CONFIRM_TITLE.to_owned()),
            message: message.into(),
            kind: options.kind.unwrap_or_default(),
            confirm_text: options.confirm_text.unwrap_or_else(|| DEFAULT_CONFIRM_TEXT.to_owned()),
            cancel_text: options.cancel_text.unwrap_or_else(|| DEFAULT_CANCEL_TEXT.to_owned()),
        };

        let superseded = self.pending.lock().unwrap_or_else(PoisonError::into_inner).replace(tx);
        if superseded.is_some() {
            tracing::debug!("unanswered confirm prompt superseded");
        }
        self.dialog.send_replace(dialog);

        rx.await.unwrap_or(false)
    }

    pub fn handle_confirm(&self) {
        self.answer(true);
    }

    pub fn handle_cancel(&self) {
        self.answer(false);
    }

    fn answer(&self, accepted: bool) {
        if let Some(tx) = self.pending.lock().unwrap_or_else(PoisonError::into_inner).take() {
            let _ = tx.send(accepted);
        }
        self.dialog.send_modify(|dialog| dialog.visible = false);
    }
}
