//! Small helpers shared by the stores.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules keep storage and clock concerns out of the stores so the
//! stores stay testable against memory storage.

pub mod clock;
pub mod dark_mode;
