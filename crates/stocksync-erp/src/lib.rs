//! HTTP client for the remote ERP inventory API.
//!
//! Wraps `reqwest` with the ERP's session-login handshake, a TTL session
//! cache, bounded fixed-delay retries on transient failures, and typed
//! decoding of the ERP's envelope shapes into [`stocksync_core::StockRecord`]s.

mod client;
mod error;
mod retry;
mod session;
mod types;

pub use client::{ErpClient, ErpConfig};
pub use error::ErpError;
