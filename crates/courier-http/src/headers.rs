//! Well-known header names and values.

use std::collections::BTreeMap;
use std::fmt;

/// Header map carried by a request descriptor.
pub type Headers = BTreeMap<String, String>;

/// Frequently used request header names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiHeaderKey {
    Accept,
    AcceptEncoding,
    ContentType,
    Authorization,
    XSecret,
    Connection,
}

impl ApiHeaderKey {
    /// Header name as sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "Accept",
            Self::AcceptEncoding => "Accept-Encoding",
            Self::ContentType => "Content-Type",
            Self::Authorization => "Authorization",
            Self::XSecret => "X-Secret",
            Self::Connection => "Connection",
        }
    }
}

impl fmt::Display for ApiHeaderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frequently used request header values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiHeaderValue {
    ApplicationJson,
    /// Prefix only; the boundary token is appended per request.
    MultipartForm,
    AcceptAny,
    AcceptEncoding,
    KeepAlive,
    Bearer,
}

impl ApiHeaderValue {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationJson => "application/json",
            Self::MultipartForm => "multipart/form-data; boundary=",
            Self::AcceptAny => "*/*",
            Self::AcceptEncoding => "gzip,deflate, br",
            Self::KeepAlive => "keep-alive",
            Self::Bearer => "Bearer",
        }
    }
}

impl fmt::Display for ApiHeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headers every request carries: Accept, Accept-Encoding and Connection.
pub fn base_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert(
        ApiHeaderKey::Accept.to_string(),
        ApiHeaderValue::AcceptAny.to_string(),
    );
    headers.insert(
        ApiHeaderKey::AcceptEncoding.to_string(),
        ApiHeaderValue::AcceptEncoding.to_string(),
    );
    headers.insert(
        ApiHeaderKey::Connection.to_string(),
        ApiHeaderValue::KeepAlive.to_string(),
    );
    headers
}

/// Base headers plus `Content-Type: application/json`.
pub fn json_headers() -> Headers {
    let mut headers = base_headers();
    headers.insert(
        ApiHeaderKey::ContentType.to_string(),
        ApiHeaderValue::ApplicationJson.to_string(),
    );
    headers
}

/// Base headers plus a multipart content type bound to `boundary`.
pub fn multipart_headers(boundary: &str) -> Headers {
    let mut headers = base_headers();
    headers.insert(
        ApiHeaderKey::ContentType.to_string(),
        format!("{}{}", ApiHeaderValue::MultipartForm, boundary),
    );
    headers
}

/// Render a bearer authorization value.
pub fn bearer(token: &str) -> String {
    format!("{} {}", ApiHeaderValue::Bearer, token)
}

/// Set the Authorization header, leaving every other entry untouched.
pub fn insert_bearer(headers: &mut Headers, token: &str) {
    headers.insert(ApiHeaderKey::Authorization.to_string(), bearer(token));
}
