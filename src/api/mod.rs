//! Syncthing REST API transport
//!
//! One [`Client`] owning (or borrowing) an HTTP session, with a normalized
//! error surface for ordinary callers and unwrapped errors for callers that
//! classify failures themselves.

mod client;
mod types;

pub use client::Client;
pub use types::{Config, ConfigBuilder, RequestConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
