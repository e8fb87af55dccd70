//! Response pipeline: HTTP check, status classification, JSON decoding.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::HttpError;
use crate::transport::{HttpHead, TransportResponse};

/// A response known to come from an HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub head: HttpHead,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn status(&self) -> u16 {
        self.head.status
    }
}

/// Reject responses that are not HTTP.
pub fn assume_http(response: TransportResponse) -> Result<HttpResponse, HttpError> {
    match response.head {
        Some(head) => Ok(HttpResponse {
            head,
            body: response.body,
        }),
        None => Err(HttpError::NonHttpResponse),
    }
}

/// Pass 2xx bodies through unchanged, map every other status to an error.
pub fn response_data(response: HttpResponse) -> Result<Bytes, HttpError> {
    let code = response.status();
    match code {
        200..=299 => Ok(response.body),
        400..=499 => Err(HttpError::RequestFailed {
            code,
            description: describe(&response),
        }),
        500..=599 => Err(HttpError::ServerError {
            code,
            description: describe(&response),
        }),
        _ => Err(HttpError::Unknown("Unknown network error".to_string())),
    }
}

fn describe(response: &HttpResponse) -> String {
    let code = response.status();
    let reason = reqwest::StatusCode::from_u16(code)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    let body = String::from_utf8_lossy(&response.body);
    let body = body.trim();

    match (reason.is_empty(), body.is_empty()) {
        (false, false) => format!("HTTP {} {}: {}", code, reason, body),
        (false, true) => format!("HTTP {} {}", code, reason),
        (true, false) => format!("HTTP {}: {}", code, body),
        (true, true) => format!("HTTP {}", code),
    }
}

/// How object keys in a response are rewritten before decoding.
#[derive(Clone, Default)]
pub enum KeyDecodingStrategy {
    /// Keys are used as they appear.
    UseDefaultKeys,
    /// `snake_case` keys become `camelCase`.
    #[default]
    ConvertFromSnakeCase,
    /// Caller-supplied key mapping.
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl fmt::Debug for KeyDecodingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UseDefaultKeys => f.write_str("UseDefaultKeys"),
            Self::ConvertFromSnakeCase => f.write_str("ConvertFromSnakeCase"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl KeyDecodingStrategy {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    pub fn convert_key(&self, key: &str) -> String {
        match self {
            Self::UseDefaultKeys => key.to_string(),
            Self::ConvertFromSnakeCase => snake_to_camel(key),
            Self::Custom(f) => f(key),
        }
    }

    /// Rewrite keys recursively.
    ///
    /// When two keys convert to the same name (`a_b` and `aB`), the one met
    /// later in the object's iteration order wins and a warning is logged.
    fn apply(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, v) in map {
                    let converted = self.convert_key(&key);
                    if out.insert(converted.clone(), self.apply(v)).is_some() {
                        tracing::warn!(
                            target: courier_log::NETWORK,
                            key = %key,
                            converted = %converted,
                            "response key collides after conversion, keeping the later value"
                        );
                    }
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.apply(v)).collect()),
            other => other,
        }
    }
}

/// `first_name` → `firstName`. Leading and trailing underscores are kept;
/// keys without inner underscores are returned unchanged.
pub fn snake_to_camel(key: &str) -> String {
    let start = key.len() - key.trim_start_matches('_').len();
    let end = key.trim_end_matches('_').len();
    if start >= end {
        return key.to_string();
    }

    let core = &key[start..end];
    if !core.contains('_') {
        return key.to_string();
    }

    let mut words = core.split('_').filter(|w| !w.is_empty());
    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..start]);
    if let Some(first) = words.next() {
        out.push_str(&first.to_lowercase());
    }
    for word in words {
        let mut chars = word.chars();
        if let Some(c) = chars.next() {
            out.extend(c.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out.push_str(&key[end..]);
    out
}

/// Decode `bytes` as `T` after rewriting keys with `strategy`.
pub fn decode_json<T: DeserializeOwned>(
    bytes: &[u8],
    strategy: &KeyDecodingStrategy,
) -> Result<T, HttpError> {
    match strategy {
        KeyDecodingStrategy::UseDefaultKeys => {
            serde_json::from_slice(bytes).map_err(HttpError::DecodingError)
        }
        _ => {
            let value: Value = serde_json::from_slice(bytes).map_err(HttpError::DecodingError)?;
            serde_json::from_value(strategy.apply(value)).map_err(HttpError::DecodingError)
        }
    }
}
