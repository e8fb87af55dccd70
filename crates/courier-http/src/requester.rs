//! Executes request descriptors and runs responses through the pipeline.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use courier_log::spans::{instrument_future, record_error, request_span, Timer};
use serde::de::DeserializeOwned;

use crate::client::{ClientBuildError, HttpConfig, ReqwestTransport};
use crate::error::HttpError;
use crate::pipeline::{self, KeyDecodingStrategy};
use crate::request::RequestDescriptor;
use crate::transport::HttpTransport;

/// Sends descriptors through an [`HttpTransport`].
///
/// Holds no per-call state; clones share the transport, and concurrent calls
/// are independent of each other. Nothing is retried.
#[derive(Clone)]
pub struct NetworkRequester {
    transport: Arc<dyn HttpTransport>,
    default_timeout: Duration,
}

impl std::fmt::Debug for NetworkRequester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkRequester")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl NetworkRequester {
    /// Requester over reqwest with the default config.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(HttpConfig::default())
    }

    /// Requester over reqwest; `config.request_timeout` becomes the default timeout.
    pub fn with_config(config: HttpConfig) -> Result<Self, ClientBuildError> {
        let transport = ReqwestTransport::with_config(&config)?;
        Ok(Self::with_transport(Arc::new(transport), config.request_timeout))
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>, default_timeout: Duration) -> Self {
        Self {
            transport,
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Perform the request and decode a 2xx body as `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
        strategy: &KeyDecodingStrategy,
    ) -> Result<T, HttpError> {
        let data = self.request_data(descriptor).await?;
        pipeline::decode_json(&data, strategy).map_err(|e| {
            tracing::warn!(target: courier_log::NETWORK, error = %e, "failed to decode response");
            e
        })
    }

    /// Perform the request and return the raw 2xx body.
    pub async fn request_data(&self, descriptor: RequestDescriptor) -> Result<Bytes, HttpError> {
        let span = request_span(descriptor.method().as_str(), descriptor.url());
        let call = async move {
            let result = self.dispatch(descriptor).await;
            if let Err(e) = &result {
                record_error(e);
            }
            result
        };
        instrument_future(call, span).await
    }

    async fn dispatch(&self, descriptor: RequestDescriptor) -> Result<Bytes, HttpError> {
        let request = descriptor.build_request(self.default_timeout).map_err(|e| {
            tracing::error!(target: courier_log::NETWORK, error = %e, "invalid request url");
            e
        })?;

        tracing::debug!(
            target: courier_log::NETWORK,
            timeout_ms = %request.timeout.as_millis(),
            "sending request"
        );
        let timer = Timer::start("http_request");
        let result = self.transport.send(request).await;
        timer.finish();

        let raw = result.map_err(|e| {
            tracing::warn!(target: courier_log::NETWORK, error = %e, "transport failure");
            HttpError::NetworkError(e)
        })?;

        let response = pipeline::assume_http(raw)?;
        tracing::Span::current().record("status", response.status());
        tracing::debug!(
            target: courier_log::NETWORK,
            status = response.status(),
            bytes = response.body.len(),
            "received response"
        );

        pipeline::response_data(response)
    }
}
