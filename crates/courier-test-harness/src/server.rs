//! Mock HTTP server built on wiremock.

use std::net::TcpListener;
use std::time::Duration;

use serde::Serialize;
use wiremock::matchers::{body_bytes, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::responses;

/// Mock server with shortcuts for the shapes courier sends.
pub struct TestHttpServer {
    server: MockServer,
}

impl TestHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL, without a trailing slash.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Answer `verb endpoint` with `response`.
    pub async fn respond(&self, verb: &str, endpoint: &str, response: ResponseTemplate) {
        Mock::given(method(verb))
            .and(path(endpoint))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub async fn get_json<T: Serialize>(&self, endpoint: &str, response: &T) {
        self.respond("GET", endpoint, responses::ok_json(response))
            .await;
    }

    pub async fn post_json<T: Serialize>(&self, endpoint: &str, response: &T) {
        self.respond("POST", endpoint, responses::ok_json(response))
            .await;
    }

    /// Answer any method on `endpoint` with `status` and a plain-text body.
    pub async fn error(&self, endpoint: &str, status: u16, body: &str) {
        Mock::given(path(endpoint))
            .respond_with(responses::status(status, body))
            .mount(&self.server)
            .await;
    }

    pub async fn with_latency<T: Serialize>(&self, endpoint: &str, response: &T, latency: Duration) {
        Mock::given(path(endpoint))
            .respond_with(responses::ok_json(response).set_delay(latency))
            .mount(&self.server)
            .await;
    }

    /// Serve `responses` in order, one per call.
    pub async fn sequence(&self, endpoint: &str, responses: Vec<ResponseTemplate>) {
        for (i, response) in responses.into_iter().enumerate() {
            Mock::given(path(endpoint))
                .respond_with(response)
                .up_to_n_times(1)
                .with_priority(100 - i as u8)
                .mount(&self.server)
                .await;
        }
    }

    /// Assert how many requests hit `endpoint`.
    pub async fn verify_received(&self, endpoint: &str, times: u64) {
        let count = self
            .received_requests()
            .await
            .iter()
            .filter(|r| r.url.path() == endpoint)
            .count() as u64;
        assert_eq!(
            count, times,
            "Expected {} requests to {}, got {}",
            times, endpoint, count
        );
    }

    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Most recent request to `endpoint`, if any.
    pub async fn last_request(&self, endpoint: &str) -> Option<Request> {
        self.received_requests()
            .await
            .into_iter()
            .rev()
            .find(|r| r.url.path() == endpoint)
    }

    /// Drop mounted mocks and recorded requests.
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}

/// Every value sent for header `name`.
pub fn header_values(request: &Request, name: &str) -> Vec<String> {
    request
        .headers
        .get_all(name)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

/// URL of a local port with nothing listening on it.
pub fn unreachable_url() -> String {
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|listener| listener.local_addr())
        .map(|addr| addr.port())
        .unwrap_or(9);
    format!("http://127.0.0.1:{}/", port)
}

/// Mock that only matches requests with the given method, headers, query and body.
pub struct MockBuilder {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    query_params: Vec<(String, String)>,
    json_body: Option<serde_json::Value>,
    raw_body: Option<Vec<u8>>,
}

impl MockBuilder {
    pub fn new(verb: &str, endpoint: &str) -> Self {
        Self {
            method: verb.to_string(),
            path: endpoint.to_string(),
            headers: Vec::new(),
            query_params: Vec::new(),
            json_body: None,
            raw_body: None,
        }
    }

    pub fn get(endpoint: &str) -> Self {
        Self::new("GET", endpoint)
    }

    pub fn post(endpoint: &str) -> Self {
        Self::new("POST", endpoint)
    }

    pub fn put(endpoint: &str) -> Self {
        Self::new("PUT", endpoint)
    }

    pub fn delete(endpoint: &str) -> Self {
        Self::new("DELETE", endpoint)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", &format!("Bearer {}", token))
    }

    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn with_json_body(mut self, body: serde_json::Value) -> Self {
        self.json_body = Some(body);
        self
    }

    pub fn with_raw_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.raw_body = Some(body.into());
        self
    }

    pub async fn mount(self, server: &TestHttpServer, response: ResponseTemplate) {
        let mut mock = Mock::given(method(self.method.as_str())).and(path(self.path.as_str()));

        for (name, value) in &self.headers {
            mock = mock.and(header(name.as_str(), value.as_str()));
        }
        for (name, value) in &self.query_params {
            mock = mock.and(query_param(name.as_str(), value.as_str()));
        }
        if let Some(body) = self.json_body {
            mock = mock.and(body_json(body));
        }
        if let Some(body) = self.raw_body {
            mock = mock.and(body_bytes(body));
        }

        mock.respond_with(response).mount(server.inner()).await;
    }
}
