//! Request spans and timing.

use std::future::Future;
use std::time::Instant;

use tracing::{field, info_span, Instrument, Span};

/// Span covering one HTTP call. `status` and `error` are recorded later.
pub fn request_span(method: &str, url: &str) -> Span {
    info_span!(
        target: crate::NETWORK,
        "request",
        method = %method,
        url = %url,
        status = field::Empty,
        error = field::Empty,
    )
}

/// Instrument a future with a span.
pub fn instrument_future<F: Future>(future: F, span: Span) -> impl Future<Output = F::Output> {
    future.instrument(span)
}

/// Record an error on the current span.
pub fn record_error(error: &dyn std::error::Error) {
    Span::current().record("error", field::display(error));
}

/// Timing utility for operations.
pub struct Timer {
    start: Instant,
    operation: &'static str,
}

impl Timer {
    /// Start a new timer.
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Log the elapsed time and return it in milliseconds.
    pub fn finish(self) -> u128 {
        let elapsed = self.start.elapsed().as_millis();
        tracing::debug!(
            target: crate::NETWORK,
            operation = %self.operation,
            duration_ms = %elapsed,
            "operation completed"
        );
        elapsed
    }
}
