//! Error taxonomy for endpoint requests.

use crate::transport::TransportError;

const TIMEOUT_STATUS: u16 = 408;
const RATE_LIMIT_STATUS: u16 = 429;

/// Every failure a request can end in.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The descriptor's URL could not be parsed.
    #[error("{0}")]
    BadUrl(String),

    #[error("Refresh token expired")]
    ExpiredAuth,

    #[error("{description}")]
    Unauthorized { code: u16, description: String },

    /// 5xx response.
    #[error("{description}")]
    ServerError { code: u16, description: String },

    /// 4xx response.
    #[error("{description}")]
    RequestFailed { code: u16, description: String },

    #[error("{0}")]
    Unknown(String),

    #[error("{0}")]
    DecodingError(#[source] serde_json::Error),

    #[error("Non HTTP Response")]
    NonHttpResponse,

    #[error("{0}")]
    NetworkError(#[source] TransportError),
}

impl HttpError {
    /// HTTP status code associated with the error, if any.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::BadUrl(_)
            | Self::Unknown(_)
            | Self::DecodingError(_)
            | Self::NonHttpResponse
            | Self::NetworkError(_) => None,
            Self::ExpiredAuth => Some(401),
            Self::Unauthorized { code, .. }
            | Self::ServerError { code, .. }
            | Self::RequestFailed { code, .. } => Some(*code),
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// Whether resubmitting the same request may succeed.
    ///
    /// Only informational; nothing in this crate retries.
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::DecodingError(_)
            | Self::BadUrl(_)
            | Self::ExpiredAuth
            | Self::Unauthorized { .. }
            | Self::Unknown(_) => false,
            Self::RequestFailed { code, .. } => {
                matches!(*code, TIMEOUT_STATUS | RATE_LIMIT_STATUS)
            }
            Self::ServerError { .. } | Self::NetworkError(_) | Self::NonHttpResponse => true,
        }
    }
}

impl From<TransportError> for HttpError {
    fn from(e: TransportError) -> Self {
        HttpError::NetworkError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoding_error() -> HttpError {
        HttpError::DecodingError(serde_json::from_str::<u32>("nope").unwrap_err())
    }

    fn request_failed(code: u16) -> HttpError {
        HttpError::RequestFailed {
            code,
            description: format!("HTTP {code}"),
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(HttpError::BadUrl("Invalid Url".into()).code(), None);
        assert_eq!(HttpError::ExpiredAuth.code(), Some(401));
        assert_eq!(
            HttpError::Unauthorized { code: 403, description: String::new() }.code(),
            Some(403)
        );
        assert_eq!(
            HttpError::ServerError { code: 503, description: String::new() }.code(),
            Some(503)
        );
        assert_eq!(request_failed(404).code(), Some(404));
        assert_eq!(HttpError::NonHttpResponse.code(), None);
        assert_eq!(decoding_error().code(), None);
        assert_eq!(HttpError::NetworkError(TransportError::Timeout).code(), None);
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(HttpError::BadUrl("Invalid Url".into()).description(), "Invalid Url");
        assert_eq!(HttpError::ExpiredAuth.description(), "Refresh token expired");
        assert_eq!(HttpError::NonHttpResponse.description(), "Non HTTP Response");
        assert_eq!(
            HttpError::Unknown("Unknown network error".into()).description(),
            "Unknown network error"
        );
        assert_eq!(request_failed(404).description(), "HTTP 404");
        assert_eq!(
            HttpError::NetworkError(TransportError::Timeout).description(),
            "request timed out"
        );
    }

    #[test]
    fn test_retriable_variants() {
        assert!(HttpError::ServerError { code: 500, description: String::new() }.is_retriable());
        assert!(HttpError::NetworkError(TransportError::Timeout).is_retriable());
        assert!(HttpError::NonHttpResponse.is_retriable());
        assert!(request_failed(408).is_retriable());
        assert!(request_failed(429).is_retriable());
    }

    #[test]
    fn test_non_retriable_variants() {
        assert!(!request_failed(400).is_retriable());
        assert!(!request_failed(404).is_retriable());
        assert!(!request_failed(499).is_retriable());
        assert!(!HttpError::BadUrl(String::new()).is_retriable());
        assert!(!HttpError::ExpiredAuth.is_retriable());
        assert!(!HttpError::Unauthorized { code: 401, description: String::new() }.is_retriable());
        assert!(!HttpError::Unknown(String::new()).is_retriable());
        assert!(!decoding_error().is_retriable());
    }

    #[test]
    fn test_source_is_preserved() {
        use std::error::Error;

        assert!(decoding_error().source().is_some());
        assert!(HttpError::NetworkError(TransportError::Timeout).source().is_some());
        assert!(HttpError::NonHttpResponse.source().is_none());
    }
}
