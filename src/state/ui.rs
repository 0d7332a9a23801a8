//! Theme state: the persisted dark-mode flag.
//!
//! DESIGN
//! ======
//! The flag lives in a watch channel so the shell can restyle on change;
//! persistence goes through `util::dark_mode` so the storage format stays in
//! one place.

#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::storage::Storage;
use crate::util::dark_mode;

pub struct ThemeState {
    dark_mode: watch::Sender<bool>,
    storage: Arc<dyn Storage>,
}

impl ThemeState {
    /// Load the stored preference; light when nothing is stored.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let (dark_mode, _) = watch::channel(dark_mode::read_preference(storage.as_ref()));
        Self { dark_mode, storage }
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        *self.dark_mode.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.dark_mode.subscribe()
    }

    /// Flip the theme and persist it. Returns the new value.
    pub fn toggle(&self) -> bool {
        let next = dark_mode::toggle(self.storage.as_ref(), self.is_dark());
        self.dark_mode.send_replace(next);
        next
    }

    /// Root class for the current theme (`light-mode` when not dark).
    #[must_use]
    pub fn css_class(&self) -> Option<&'static str> {
        dark_mode::root_class(self.is_dark())
    }
}
