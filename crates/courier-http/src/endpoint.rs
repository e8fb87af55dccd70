//! Endpoint capabilities and descriptor construction.
//!
//! An [`Endpoint`] describes one logical API call. The provided methods
//! delegate to [`build_json_request`] and [`build_multipart_request`], which
//! can also be called directly by code that composes endpoints differently.

use std::time::Duration;

use serde::Serialize;

use crate::environment::Environment;
use crate::file::UploadFile;
use crate::headers::{self, Headers};
use crate::method::HttpMethod;
use crate::multipart;
use crate::request::{QueryParameters, RequestDescriptor};

/// A caller-defined API call.
///
/// Bodiless endpoints use `type Body = ();` and keep the default `body`.
pub trait Endpoint {
    type Body: Serialize;

    /// Full URL of the endpoint in `environment`.
    fn url(&self, environment: Environment) -> String;

    fn method(&self) -> HttpMethod;

    /// Per-endpoint timeout; `None` defers to the requester's default.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }

    /// Headers for JSON requests.
    fn headers(&self) -> Headers {
        headers::json_headers()
    }

    /// Descriptor for an unauthenticated JSON request.
    fn request(&self, environment: Environment, query: QueryParameters) -> RequestDescriptor
    where
        Self: Sized,
    {
        build_json_request(self, environment, query, None)
    }

    /// Descriptor for an unauthenticated multipart request.
    fn multipart_request<I, K, V>(
        &self,
        environment: Environment,
        query: QueryParameters,
        text_fields: I,
        file: Option<&dyn UploadFile>,
        file_field_key: &str,
    ) -> RequestDescriptor
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        build_multipart_request(self, environment, query, None, text_fields, file, file_field_key)
    }
}

/// An endpoint that requires a bearer token.
pub trait ProtectedEndpoint: Endpoint {
    /// Descriptor for a JSON request carrying `Authorization: Bearer {token}`.
    fn authorized_request(
        &self,
        environment: Environment,
        query: QueryParameters,
        access_token: &str,
    ) -> RequestDescriptor
    where
        Self: Sized,
    {
        build_json_request(self, environment, query, Some(access_token))
    }

    /// Descriptor for a multipart request carrying a bearer token.
    fn authorized_multipart_request<I, K, V>(
        &self,
        environment: Environment,
        query: QueryParameters,
        access_token: &str,
        text_fields: I,
        file: Option<&dyn UploadFile>,
        file_field_key: &str,
    ) -> RequestDescriptor
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        build_multipart_request(
            self,
            environment,
            query,
            Some(access_token),
            text_fields,
            file,
            file_field_key,
        )
    }
}

/// Build a JSON descriptor from `endpoint`.
pub fn build_json_request<E: Endpoint>(
    endpoint: &E,
    environment: Environment,
    query: QueryParameters,
    access_token: Option<&str>,
) -> RequestDescriptor {
    let mut headers = endpoint.headers();
    if let Some(token) = access_token {
        headers::insert_bearer(&mut headers, token);
    }

    let mut descriptor = RequestDescriptor::new(endpoint.url(environment), endpoint.method())
        .with_headers(headers)
        .with_query(query);
    if let Some(timeout) = endpoint.timeout() {
        descriptor = descriptor.with_timeout(timeout);
    }
    if let Some(body) = endpoint.body() {
        descriptor = descriptor.with_json(body);
    }
    descriptor
}

/// Build a multipart descriptor from `endpoint` with a fresh boundary.
pub fn build_multipart_request<E, I, K, V>(
    endpoint: &E,
    environment: Environment,
    query: QueryParameters,
    access_token: Option<&str>,
    text_fields: I,
    file: Option<&dyn UploadFile>,
    file_field_key: &str,
) -> RequestDescriptor
where
    E: Endpoint,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let boundary = multipart::new_boundary();
    let mut headers = headers::multipart_headers(&boundary);
    if let Some(token) = access_token {
        headers::insert_bearer(&mut headers, token);
    }

    let body = multipart::build_multipart_body(&boundary, text_fields, file, file_field_key);

    let descriptor = RequestDescriptor::new(endpoint.url(environment), endpoint.method())
        .with_headers(headers)
        .with_query(query)
        .with_body(Some(body));
    match endpoint.timeout() {
        Some(timeout) => descriptor.with_timeout(timeout),
        None => descriptor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::FileAttachment;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Credentials {
        login: String,
        password: String,
    }

    struct Login {
        credentials: Credentials,
    }

    impl Endpoint for Login {
        type Body = Credentials;

        fn url(&self, environment: Environment) -> String {
            match environment {
                Environment::Development => "https://dev.example.com/login".to_string(),
                Environment::Production => "https://example.com/login".to_string(),
            }
        }

        fn method(&self) -> HttpMethod {
            HttpMethod::Post
        }

        fn body(&self) -> Option<&Credentials> {
            Some(&self.credentials)
        }
    }

    struct Avatar;

    impl Endpoint for Avatar {
        type Body = ();

        fn url(&self, _: Environment) -> String {
            "https://example.com/profile/avatar".to_string()
        }

        fn method(&self) -> HttpMethod {
            HttpMethod::Put
        }

        fn timeout(&self) -> Option<Duration> {
            Some(Duration::from_secs(120))
        }
    }

    impl ProtectedEndpoint for Avatar {}

    fn login() -> Login {
        Login {
            credentials: Credentials {
                login: "neo".into(),
                password: "zion".into(),
            },
        }
    }

    #[test]
    fn test_json_request() {
        let descriptor = login().request(Environment::Development, QueryParameters::new());

        assert_eq!(descriptor.url(), "https://dev.example.com/login");
        assert_eq!(descriptor.method(), HttpMethod::Post);
        assert_eq!(descriptor.headers(), &headers::json_headers());
        assert_eq!(descriptor.timeout(), None);

        let body: serde_json::Value = serde_json::from_slice(descriptor.body().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"login": "neo", "password": "zion"}));
    }

    #[test]
    fn test_multipart_without_endpoint_timeout_defers_to_requester() {
        let descriptor = login().multipart_request(
            Environment::Production,
            QueryParameters::new(),
            [("a", "1")],
            None,
            "file",
        );
        assert_eq!(descriptor.timeout(), None);
    }

    #[test]
    fn test_environment_selects_url() {
        let descriptor = login().request(Environment::Production, QueryParameters::new());
        assert_eq!(descriptor.url(), "https://example.com/login");
    }

    #[test]
    fn test_bodiless_endpoint_has_no_body() {
        let descriptor = Avatar.request(Environment::Production, QueryParameters::new());
        assert!(descriptor.body().is_none());
        assert_eq!(descriptor.timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_bearer_added_once_without_overriding() {
        let descriptor =
            Avatar.authorized_request(Environment::Production, QueryParameters::new(), "abc");
        let headers = descriptor.headers();

        assert_eq!(headers["Authorization"], "Bearer abc");
        assert_eq!(headers.keys().filter(|k| *k == "Authorization").count(), 1);
        assert_eq!(headers.len(), headers::json_headers().len() + 1);
        for (key, value) in headers::json_headers() {
            assert_eq!(headers[&key], value);
        }
    }

    #[test]
    fn test_multipart_request() {
        let file = FileAttachment::new("me.png", vec![1u8, 2, 3]);
        let descriptor = Avatar.authorized_multipart_request(
            Environment::Production,
            QueryParameters::new(),
            "abc",
            [("caption", "hello")],
            Some(&file),
            "avatar",
        );

        let content_type = &descriptor.headers()["Content-Type"];
        let boundary = content_type
            .strip_prefix("multipart/form-data; boundary=")
            .unwrap();
        assert!(!boundary.is_empty());
        assert_eq!(descriptor.headers()["Authorization"], "Bearer abc");
        assert_eq!(descriptor.headers()["Accept"], "*/*");
        assert_eq!(descriptor.method(), HttpMethod::Put);
        assert_eq!(descriptor.timeout(), Some(Duration::from_secs(120)));

        let body = descriptor.body().unwrap();
        let expected =
            multipart::build_multipart_body(boundary, [("caption", "hello")], Some(&file), "avatar");
        assert_eq!(body, &expected);
    }

    #[test]
    fn test_each_multipart_request_gets_a_new_boundary() {
        let first = Avatar.multipart_request(
            Environment::Production,
            QueryParameters::new(),
            [("a", "1")],
            None,
            "file",
        );
        let second = Avatar.multipart_request(
            Environment::Production,
            QueryParameters::new(),
            [("a", "1")],
            None,
            "file",
        );

        assert_ne!(first.headers()["Content-Type"], second.headers()["Content-Type"]);
        assert!(!first.headers().contains_key("Authorization"));
    }
}
