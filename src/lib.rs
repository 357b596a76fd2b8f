//! # syncthing-api
//!
//! A minimal, asynchronous low-level client for the Syncthing REST API.
//!
//! ## Features
//!
//! - **One call surface**: `request` maps verb + path + query + JSON body to
//!   an HTTP call and returns the decoded JSON value
//! - **Normalized errors**: every request failure collapses into a single
//!   error kind with the original cause preserved; `raw_request` exposes the
//!   unwrapped failures for custom retry logic
//! - **Deadline per request**: one timeout covers connect, send, and receive
//! - **Server identity**: optional trusted root certificate and verification
//!   toggle for the built-in session
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use syncthing_api::{Client, Config, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::builder("abc123")
//!         .base_url("http://127.0.0.1:8384")
//!         .build();
//!     let client = Client::with_config(config)?;
//!
//!     let pong = client.get("/rest/system/ping").await?;
//!     println!("{pong}");
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]

/// Error types for the client
pub mod error;

/// Common types and type aliases
pub mod types;

/// The REST API transport client
pub mod api;

pub use api::{Client, Config, ConfigBuilder, RequestConfig};
pub use error::{Error, RawError, Result};
pub use types::{JsonObject, JsonValue, Method, StringMap};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
