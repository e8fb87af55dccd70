//! Courier test harness
//!
//! Shared helpers for exercising courier against a local mock HTTP server.

pub mod responses;
pub mod server;

pub use server::{header_values, unreachable_url, MockBuilder, TestHttpServer};

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once per process.
///
/// `RUST_LOG` overrides the default `warn,courier=debug` filter.
pub fn init() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn,courier=debug"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_file(true)
            .with_line_number(true)
            .try_init()
            .ok();
    });

    Lazy::force(&INIT);
}
