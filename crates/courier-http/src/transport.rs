//! Transport boundary between the request pipeline and the network.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

use crate::headers::Headers;
use crate::method::HttpMethod;

/// A fully rendered request, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Bytes>,
    pub timeout: Duration,
}

/// HTTP status and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpHead {
    pub status: u16,
    pub headers: Headers,
}

/// Raw result of a round-trip.
///
/// `head` is `None` when the transport answered with something that is not
/// an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub body: Bytes,
    pub head: Option<HttpHead>,
}

impl TransportResponse {
    pub fn http(status: u16, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            head: Some(HttpHead { status, headers }),
        }
    }

    pub fn non_http(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            head: None,
        }
    }
}

/// Transport-level failures (DNS, TLS, connection reset, timeout).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// Failure reported by a custom [`HttpTransport`] in its own terms.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e)
        } else {
            TransportError::Request(e)
        }
    }
}

/// Executes rendered requests.
///
/// The timeout carried by the request must be enforced by the transport.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
