//! # hotpush-console
//!
//! Admin console client for the hotpush hot-topic aggregation and push
//! service. Holds the session, the API gateway with its error contract, the
//! dashboard counters, the guarded route table, and the small UI stores
//! (toasts, confirm prompt, theme). The `hotpush` binary drives it from a
//! terminal.

pub mod config;
pub mod context;
pub mod net;
pub mod routes;
pub mod state;
pub mod storage;
pub mod util;

#[cfg(test)]
pub(crate) mod test_helpers;
