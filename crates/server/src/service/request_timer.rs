use std::sync::Arc;
use std::time::Instant;

use crate::metrics::{emit_counter, emit_histogram, names, tags, MetricsSink};

use super::error::BasketError;

/// Counts and times one facade call. Recording happens on drop so a call
/// abandoned mid-flight still shows up, with outcome `cancelled`.
pub(crate) struct RequestTimer {
    sink: Arc<dyn MetricsSink>,
    operation: &'static str,
    start: Instant,
    outcome: Option<&'static str>,
}

impl RequestTimer {
    pub(crate) fn start(sink: Arc<dyn MetricsSink>, operation: &'static str) -> Self {
        Self {
            sink,
            operation,
            start: Instant::now(),
            outcome: None,
        }
    }

    pub(crate) fn finish<T>(mut self, result: &Result<T, BasketError>) {
        self.outcome = Some(match result {
            Ok(_) => "ok",
            Err(e) => e.outcome(),
        });
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let outcome = self.outcome.unwrap_or("cancelled");
        emit_counter(
            self.sink.as_ref(),
            names::REQUESTS_TOTAL,
            1,
            &tags(&[("operation", self.operation), ("outcome", outcome)]),
        );
        emit_histogram(
            self.sink.as_ref(),
            names::REQUEST_DURATION_SECONDS,
            self.start.elapsed().as_secs_f64(),
            &tags(&[("operation", self.operation)]),
        );
    }
}
