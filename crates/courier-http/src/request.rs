//! Request descriptors and their rendering into transport requests.

use std::collections::BTreeMap;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use url::Url;

use crate::error::HttpError;
use crate::headers::Headers;
use crate::method::HttpMethod;
use crate::transport::TransportRequest;

/// Timeout applied when neither the descriptor nor the requester set one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameters of a request.
pub type QueryParameters = BTreeMap<String, String>;

/// Everything needed to perform one HTTP call.
///
/// Built once per call and consumed by the requester. A present body is
/// already encoded and is sent as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    url: String,
    method: HttpMethod,
    headers: Headers,
    query: QueryParameters,
    body: Option<Bytes>,
    timeout: Option<Duration>,
}

impl RequestDescriptor {
    /// Create a descriptor with no headers, query or body.
    pub fn new(url: impl Into<String>, method: HttpMethod) -> Self {
        Self {
            url: url.into(),
            method,
            headers: Headers::new(),
            query: QueryParameters::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Add a single header, replacing a previous value for the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, query: QueryParameters) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Option<Bytes>) -> Self {
        self.body = body;
        self
    }

    /// Serialize `value` as the JSON body.
    ///
    /// A value that fails to serialize leaves the body empty.
    pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        self.with_body(encode_json_body(value))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn query(&self) -> &QueryParameters {
        &self.query
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Render into a transport request.
    ///
    /// `default_timeout` applies when the descriptor carries no timeout.
    /// Query parameters are appended to any query already in the URL.
    pub fn build_request(self, default_timeout: Duration) -> Result<TransportRequest, HttpError> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| HttpError::BadUrl(format!("Invalid Url: {}", e)))?;

        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }

        Ok(TransportRequest {
            method: self.method,
            url,
            headers: self.headers,
            body: self.body,
            timeout: self.timeout.unwrap_or(default_timeout),
        })
    }
}

/// Encode `value` as JSON, logging and returning `None` on failure.
pub fn encode_json_body<T: Serialize + ?Sized>(value: &T) -> Option<Bytes> {
    match serde_json::to_vec(value) {
        Ok(bytes) => Some(Bytes::from(bytes)),
        Err(e) => {
            tracing::error!(target: courier_log::OTHER, "Error encoding data: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Login {
        user_name: String,
        remember: bool,
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot encode"))
        }
    }

    fn query(pairs: &[(&str, &str)]) -> QueryParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_query_parameters_rendered() {
        let request = RequestDescriptor::new("https://api.example.com/items", HttpMethod::Get)
            .with_query(query(&[("x", "1"), ("y", "2")]))
            .build_request(DEFAULT_TIMEOUT)
            .unwrap();

        let pairs: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("x").map(String::as_str), Some("1"));
        assert_eq!(pairs.get("y").map(String::as_str), Some("2"));
        assert_eq!(request.url.path(), "/items");
    }

    #[test]
    fn test_query_values_are_percent_encoded() {
        let request = RequestDescriptor::new("https://api.example.com/search", HttpMethod::Get)
            .with_query(query(&[("q", "a b&c")]))
            .build_request(DEFAULT_TIMEOUT)
            .unwrap();

        assert_eq!(request.url.query(), Some("q=a+b%26c"));
    }

    #[test]
    fn test_no_query_leaves_url_untouched() {
        let request = RequestDescriptor::new("https://api.example.com/items", HttpMethod::Get)
            .build_request(DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(request.url.as_str(), "https://api.example.com/items");
    }

    #[test]
    fn test_existing_query_is_kept() {
        let request = RequestDescriptor::new("https://api.example.com/items?page=2", HttpMethod::Get)
            .with_query(query(&[("size", "10")]))
            .build_request(DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(request.url.query(), Some("page=2&size=10"));
    }

    #[test]
    fn test_empty_url_is_bad_url() {
        let err = RequestDescriptor::new("", HttpMethod::Get)
            .build_request(DEFAULT_TIMEOUT)
            .unwrap_err();
        assert!(matches!(err, HttpError::BadUrl(ref msg) if msg.starts_with("Invalid Url")));
    }

    #[test]
    fn test_relative_url_is_bad_url() {
        let err = RequestDescriptor::new("/no/host", HttpMethod::Post)
            .build_request(DEFAULT_TIMEOUT)
            .unwrap_err();
        assert!(matches!(err, HttpError::BadUrl(_)));
    }

    #[test]
    fn test_timeout_resolution() {
        let fallback = Duration::from_secs(12);

        let request = RequestDescriptor::new("https://a.example", HttpMethod::Get)
            .build_request(fallback)
            .unwrap();
        assert_eq!(request.timeout, fallback);

        let request = RequestDescriptor::new("https://a.example", HttpMethod::Get)
            .with_timeout(Duration::from_millis(1500))
            .build_request(fallback)
            .unwrap();
        assert_eq!(request.timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_method_headers_and_body_carried() {
        let request = RequestDescriptor::new("https://a.example/login", HttpMethod::Post)
            .header("Content-Type", "application/json")
            .header("X-Secret", "s")
            .with_json(&Login {
                user_name: "neo".into(),
                remember: true,
            })
            .build_request(DEFAULT_TIMEOUT)
            .unwrap();

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers["X-Secret"], "s");
        let body: serde_json::Value = serde_json::from_slice(request.body.as_ref().unwrap()).unwrap();
        assert_eq!(body["user_name"], "neo");
        assert_eq!(body["remember"], true);
    }

    #[test]
    fn test_unencodable_body_is_absent() {
        assert!(encode_json_body(&Unencodable).is_none());

        let descriptor = RequestDescriptor::new("https://a.example", HttpMethod::Put)
            .with_json(&Unencodable);
        assert!(descriptor.body().is_none());
    }

    #[test]
    fn test_body_is_not_reencoded() {
        let raw = Bytes::from_static(b"{\"already\":\"encoded\"}");
        let request = RequestDescriptor::new("https://a.example", HttpMethod::Post)
            .with_body(Some(raw.clone()))
            .build_request(DEFAULT_TIMEOUT)
            .unwrap();
        assert_eq!(request.body, Some(raw));
    }
}
