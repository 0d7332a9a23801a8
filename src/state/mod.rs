//! Client-side stores. Each owns its state in a `tokio::sync::watch` channel
//! and is the only writer of it.

pub mod confirm;
pub mod session;
pub mod stats;
pub mod toast;
pub mod ui;
