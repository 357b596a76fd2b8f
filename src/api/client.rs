//! Low-level client for the Syncthing REST API
//!
//! Owns (or borrows) a `reqwest` session, joins request paths onto the
//! configured base URL, injects the `X-API-Key` header, bounds every request
//! with one deadline, and either surfaces failures unwrapped
//! ([`Client::raw_request`]) or collapsed into the single normalized error
//! ([`Client::request`]).

use super::types::{Config, RequestConfig};
use crate::error::{Error, RawError, Result};
use crate::types::{JsonValue, Method};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the API key credential.
const API_KEY_HEADER: &str = "X-API-Key";

/// The HTTP session and who is responsible for closing it.
///
/// An owned session was built by the client and is dropped on `close()`; the
/// empty slot is the terminal closed state. A borrowed session was supplied
/// by the caller, who keeps closing responsibility; `close()` never touches
/// it.
enum Session {
    Owned(RwLock<Option<reqwest::Client>>),
    Borrowed(reqwest::Client),
}

impl Session {
    /// A usable handle on the session, or the closed error.
    async fn handle(&self) -> std::result::Result<reqwest::Client, RawError> {
        match self {
            Session::Owned(slot) => slot.read().await.clone().ok_or(RawError::ClientClosed),
            Session::Borrowed(http) => Ok(http.clone()),
        }
    }
}

/// Low-level Syncthing REST API client
pub struct Client {
    config: Config,
    base_url: Url,
    session: Session,
}

impl Client {
    /// Create a client with the given API key and default configuration.
    ///
    /// The client builds and owns its HTTP session.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::new(api_key))
    }

    /// Create a client with a custom configuration.
    ///
    /// The client builds and owns its HTTP session, configured with the
    /// deadline as its default timeout and the TLS settings applied.
    pub fn with_config(config: Config) -> Result<Self> {
        let base_url = config.validate()?;
        let session = build_session(&config)?;

        Ok(Self {
            config,
            base_url,
            session: Session::Owned(RwLock::new(Some(session))),
        })
    }

    /// Create a client on top of a caller-supplied session.
    ///
    /// The caller keeps ownership: [`Client::close`] is inert and the
    /// session's own transport settings win over the config's TLS fields.
    /// The config is still validated, including the certificate existence
    /// check.
    pub fn with_session(config: Config, session: reqwest::Client) -> Result<Self> {
        let base_url = config.validate()?;

        Ok(Self {
            config,
            base_url,
            session: Session::Borrowed(session),
        })
    }

    /// The client configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The parsed base URL requests resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether the client built its own session.
    pub fn owns_session(&self) -> bool {
        matches!(self.session, Session::Owned(_))
    }

    /// Make a GET request
    pub async fn get(&self, uri: &str) -> Result<JsonValue> {
        self.request(Method::GET, uri, RequestConfig::default())
            .await
    }

    /// Make a GET request with config
    pub async fn get_with_config(&self, uri: &str, request: RequestConfig) -> Result<JsonValue> {
        self.request(Method::GET, uri, request).await
    }

    /// Make a POST request with a JSON body
    pub async fn post(&self, uri: &str, body: JsonValue) -> Result<JsonValue> {
        self.request(Method::POST, uri, RequestConfig::new().json(body))
            .await
    }

    /// Make a POST request with config
    pub async fn post_with_config(&self, uri: &str, request: RequestConfig) -> Result<JsonValue> {
        self.request(Method::POST, uri, request).await
    }

    /// Perform a request with error normalization.
    ///
    /// Delegates to [`Client::raw_request`]; any failure (transport,
    /// timeout, non-2xx status, JSON decode) comes back as the single
    /// [`Error::Syncthing`] kind with the original failure as its source.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        request: RequestConfig,
    ) -> Result<JsonValue> {
        self.raw_request(method, uri, request)
            .await
            .map_err(Error::from)
    }

    /// Perform a request and decode the response into a caller-supplied type.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        uri: &str,
        request: RequestConfig,
    ) -> Result<T> {
        let value = self.request(method, uri, request).await?;
        serde_json::from_value(value).map_err(|e| Error::Syncthing {
            source: RawError::JsonDecode(e),
        })
    }

    /// Perform a request without error normalization.
    ///
    /// Resolves `uri` against the base URL (absolute URLs override it),
    /// applies the query parameters, sets `Accept: application/json` and the
    /// `X-API-Key` header, serializes the body as JSON when present, and
    /// bounds the whole cycle with the configured deadline. A non-2xx status
    /// is a failure; its body is captured as text, never interpreted.
    ///
    /// Every failure propagates as its native [`RawError`] variant so
    /// callers can run their own retry or classification logic on top.
    pub async fn raw_request(
        &self,
        method: Method,
        uri: &str,
        request: RequestConfig,
    ) -> std::result::Result<JsonValue, RawError> {
        let http = self.session.handle().await?;
        let method = reqwest::Method::from(method);
        let url = self.base_url.join(uri)?;

        let mut req = http
            .request(method.clone(), url.clone())
            .timeout(self.config.timeout)
            .header(ACCEPT, "application/json")
            .header(API_KEY_HEADER, self.config.api_key.as_str());

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} {} failed with status {}", method, url, status.as_u16());
            return Err(RawError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        let value = serde_json::from_slice(&bytes)?;

        debug!("{} {} succeeded", method, url);
        Ok(value)
    }

    /// Close an owned session, releasing its pooled connections.
    ///
    /// Idempotent; a second call observes the empty slot and does nothing.
    /// Inert for a caller-supplied session. Requests issued after closing an
    /// owned session fail with [`RawError::ClientClosed`].
    pub async fn close(&self) {
        if let Session::Owned(slot) = &self.session {
            if slot.write().await.take().is_some() {
                debug!("closed owned HTTP session");
            }
        }
    }

    /// Whether an owned session has been closed. Always false for a
    /// caller-supplied session.
    pub async fn is_closed(&self) -> bool {
        match &self.session {
            Session::Owned(slot) => slot.read().await.is_none(),
            Session::Borrowed(_) => false,
        }
    }

    /// Map a transport error, folding deadline expiry into its own variant.
    fn transport_error(&self, err: reqwest::Error) -> RawError {
        if err.is_timeout() {
            RawError::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }
        } else {
            RawError::Http(err)
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.config.timeout)
            .field("owns_session", &self.owns_session())
            .finish_non_exhaustive()
    }
}

/// Build the owned HTTP session from the config.
fn build_session(config: &Config) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

    if !config.verify_tls {
        builder = builder.danger_accept_invalid_certs(true);
    }

    if let Some(path) = &config.tls_cert_file {
        let pem = std::fs::read(path)?;
        let cert = reqwest::Certificate::from_pem(&pem).map_err(|source| {
            Error::InvalidCertificate {
                path: path.clone(),
                source,
            }
        })?;
        builder = builder.add_root_certificate(cert);
    }

    Ok(builder.build()?)
}
