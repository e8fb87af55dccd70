//! Endpoint-driven HTTP requests for courier.
//!
//! An [`Endpoint`] turns into a [`RequestDescriptor`] (JSON or
//! multipart/form-data body), which a [`NetworkRequester`] sends through an
//! [`HttpTransport`]. Every failure along the way ends up as an [`HttpError`].
//!
//! ```no_run
//! use courier_http::{
//!     Endpoint, Environment, HttpMethod, KeyDecodingStrategy, NetworkRequester, QueryParameters,
//! };
//!
//! struct Accounts;
//!
//! impl Endpoint for Accounts {
//!     type Body = ();
//!
//!     fn url(&self, environment: Environment) -> String {
//!         match environment {
//!             Environment::Development => "https://dev.example.com/accounts".into(),
//!             Environment::Production => "https://example.com/accounts".into(),
//!         }
//!     }
//!
//!     fn method(&self) -> HttpMethod {
//!         HttpMethod::Get
//!     }
//! }
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let requester = NetworkRequester::new()?;
//! let descriptor = Accounts.request(Environment::from_env(), QueryParameters::new());
//! let accounts: Vec<serde_json::Value> = requester
//!     .request(descriptor, &KeyDecodingStrategy::default())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoint;
pub mod environment;
pub mod error;
pub mod file;
pub mod headers;
pub mod method;
pub mod multipart;
pub mod pipeline;
pub mod request;
pub mod requester;
pub mod transport;

pub use client::{build_client, ClientBuildError, HttpConfig, ReqwestTransport};
pub use endpoint::{build_json_request, build_multipart_request, Endpoint, ProtectedEndpoint};
pub use environment::{Environment, EnvironmentError};
pub use error::HttpError;
pub use file::{FileAttachment, FileType, UploadFile};
pub use headers::{ApiHeaderKey, ApiHeaderValue, Headers};
pub use method::HttpMethod;
pub use multipart::{build_multipart_body, MultipartBody};
pub use pipeline::{decode_json, KeyDecodingStrategy};
pub use request::{QueryParameters, RequestDescriptor, DEFAULT_TIMEOUT};
pub use requester::NetworkRequester;
pub use transport::{HttpHead, HttpTransport, TransportError, TransportRequest, TransportResponse};
