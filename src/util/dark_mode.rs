//! Dark-mode preference persistence.
//!
//! Reads the preference from durable storage and writes it back on toggle.
//! A light theme is signalled by the `light-mode` root class; dark needs no
//! class.
//!
//! TRADE-OFFS
//! ==========
//! Persistence is best-effort: a failed write is logged and the in-memory
//! value still flips, so the current process keeps the user's choice.

#[cfg(test)]
#[path = "dark_mode_test.rs"]
mod dark_mode_test;

use crate::storage::{DARK_MODE_KEY, Storage};

/// Root class applied while the light theme is active.
pub const LIGHT_MODE_CLASS: &str = "light-mode";

/// Read the stored preference. Anything other than `"true"` means light.
#[must_use]
pub fn read_preference(storage: &dyn Storage) -> bool {
    storage.get_item(DARK_MODE_KEY).is_some_and(|val| val == "true")
}

/// Class the document root carries for `enabled`.
#[must_use]
pub fn root_class(enabled: bool) -> Option<&'static str> {
    (!enabled).then_some(LIGHT_MODE_CLASS)
}

/// Flip the preference and persist the new value.
pub fn toggle(storage: &dyn Storage, current: bool) -> bool {
    let next = !current;
    if let Err(e) = storage.set_item(DARK_MODE_KEY, if next { "true" } else { "false" }) {
        tracing::warn!(error = %e, "failed to persist dark mode preference");
    }
    next
}
