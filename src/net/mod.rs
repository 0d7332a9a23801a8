//! Backend plumbing: wire types, the transport seam, the gateway, and the
//! per-view endpoint helpers.

pub mod admin;
pub mod api;
pub mod error;
pub mod transport;
pub mod types;
