//! HTTP client configuration and the reqwest-backed transport.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder};

use crate::headers::{ApiHeaderKey, Headers};
use crate::request::DEFAULT_TIMEOUT;
use crate::transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};

pub const COURIER_HTTP_CONNECT_TIMEOUT: &str = "COURIER_HTTP_CONNECT_TIMEOUT";
pub const COURIER_HTTP_TIMEOUT: &str = "COURIER_HTTP_TIMEOUT";
pub const COURIER_HTTP_USER_AGENT: &str = "COURIER_HTTP_USER_AGENT";

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout used when a descriptor does not set one.
    pub request_timeout: Duration,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Negotiate and decode compressed responses (gzip, deflate, brotli).
    pub gzip: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: DEFAULT_TIMEOUT,
            user_agent: format!("courier/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 10,
            gzip: true,
        }
    }
}

impl HttpConfig {
    /// Defaults overridden by `COURIER_HTTP_*` variables.
    ///
    /// Timeouts are in seconds; fractional values are accepted. Unparseable
    /// values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(timeout) = env_seconds(COURIER_HTTP_CONNECT_TIMEOUT) {
            config.connect_timeout = timeout;
        }
        if let Some(timeout) = env_seconds(COURIER_HTTP_TIMEOUT) {
            config.request_timeout = timeout;
        }
        if let Ok(user_agent) = env::var(COURIER_HTTP_USER_AGENT) {
            config.user_agent = user_agent;
        }

        config
    }
}

fn env_seconds(var: &str) -> Option<Duration> {
    let raw = env::var(var).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => Some(Duration::from_secs_f64(secs)),
        _ => {
            tracing::warn!(target: courier_log::OTHER, "ignoring invalid {}: {}", var, raw);
            None
        }
    }
}

/// Build a configured reqwest client.
pub fn build_client(config: &HttpConfig) -> Result<Client, ClientBuildError> {
    let builder = ClientBuilder::new()
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .gzip(config.gzip)
        .deflate(config.gzip)
        .brotli(config.gzip);

    builder.build().map_err(ClientBuildError)
}

/// The reqwest client could not be constructed.
#[derive(Debug, thiserror::Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ClientBuildError(#[source] pub reqwest::Error);

/// [`HttpTransport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(&HttpConfig::default())
    }

    pub fn with_config(config: &HttpConfig) -> Result<Self, ClientBuildError> {
        Ok(Self {
            inner: build_client(config)?,
        })
    }

    /// Wrap an existing client.
    pub fn from_client(inner: Client) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .inner
            .request(request.method.into(), request.url)
            .headers(to_header_map(&request.headers))
            .timeout(request.timeout);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = from_header_map(response.headers());
        let body = response.bytes().await?;

        Ok(TransportResponse::http(status, headers, body))
    }
}

/// Invalid names or values are dropped with a warning.
///
/// `Accept-Encoding` is never forwarded: reqwest advertises exactly the
/// encodings it is configured to decode.
fn to_header_map(headers: &Headers) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if name.eq_ignore_ascii_case(ApiHeaderKey::AcceptEncoding.as_str()) {
            continue;
        }
        match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!(target: courier_log::NETWORK, header = %name, "dropping invalid header"),
        }
    }
    map
}

/// Non-UTF-8 values are skipped; repeated headers keep the last value.
fn from_header_map(headers: &HeaderMap) -> Headers {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
