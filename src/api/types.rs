//! Client and request configuration types

use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Default Syncthing GUI/REST address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8384";

/// Default per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the client
///
/// Immutable for the client's lifetime. Carries serde derives so callers can
/// embed it in their own configuration files; this crate defines no loader.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// API key sent as `X-API-Key` on every request.
    pub api_key: String,
    /// Base address all relative request paths resolve against.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline covering one full request-response cycle.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
    /// Verify the server certificate on an internally created session.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Optional PEM certificate added as a trusted root for an internally
    /// created session. Must exist as a regular file at construction time.
    #[serde(default)]
    pub tls_cert_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_verify_tls() -> bool {
    true
}

impl Config {
    /// Create a config with the given API key and defaults for everything else
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
            tls_cert_file: None,
        }
    }

    /// Create a new config builder
    pub fn builder(api_key: impl Into<String>) -> ConfigBuilder {
        ConfigBuilder {
            config: Self::new(api_key),
        }
    }

    /// Validate the config and return the parsed base URL.
    ///
    /// Fails if the API key is empty, the timeout is zero, the base URL is
    /// not an absolute URL, or the certificate path does not resolve to a
    /// regular file.
    pub(crate) fn validate(&self) -> Result<Url> {
        if self.api_key.is_empty() {
            return Err(Error::missing_field("api_key"));
        }
        if self.timeout.is_zero() {
            return Err(Error::invalid_value("timeout", "must be positive"));
        }
        if let Some(path) = &self.tls_cert_file {
            if !path.is_file() {
                return Err(Error::CertificateNotFound { path: path.clone() });
            }
        }
        Ok(Url::parse(&self.base_url)?)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("tls_cert_file", &self.tls_cert_file)
            .finish()
    }
}

/// Builder for the client config
#[derive(Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the request deadline
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Enable or disable server certificate verification
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.config.verify_tls = verify;
        self
    }

    /// Trust the PEM certificate at the given path
    pub fn tls_cert_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tls_cert_file = Some(path.into());
        self
    }

    /// Build the config
    pub fn build(self) -> Config {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }
}
