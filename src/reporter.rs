//! Per-call lifecycle reporting.
//!
//! A [`CallReporter`] is created when a call arrives and consumed by its
//! terminal method:
//!
//! ```text
//!   new() ──► started_total += 1, start clock (if histogram enabled)
//!     │
//!     ├── received_message() / sent_message()   (zero or more)
//!     │
//!     └── handled(code) | handled_with_status(&status)
//!             handled_total += 1, observe latency (if enabled)
//! ```
//!
//! The terminal methods take `self`, so a reporter cannot report twice.
//! A call that is dropped without a terminal method leaves `started_total`
//! ahead of `handled_total`.

use std::sync::Arc;
use std::time::Instant;

use tonic::{Code, Status};
use tracing::trace;

use crate::call::{CallIdentity, CallType};
use crate::registry::ServerMetrics;
use crate::sanitize::sanitize;

/// Reports metrics for one in-flight call.
///
/// Not synchronized: drive it from the task serving the call.
#[derive(Debug)]
pub struct CallReporter {
    metrics: Arc<ServerMetrics>,
    identity: CallIdentity,
    start: Option<Instant>,
    error_label_max_length: u8,
}

impl CallReporter {
    /// Start reporting a call and count it as started.
    ///
    /// The clock is only read when the latency histogram is enabled.
    /// Malformed method paths are reported under the `unknown` identity.
    pub fn new(
        metrics: Arc<ServerMetrics>,
        call_type: CallType,
        full_method: &str,
        error_label_max_length: u8,
    ) -> Self {
        let start = metrics
            .handling_time_histogram_enabled()
            .then(Instant::now);
        let identity = CallIdentity::new(call_type, full_method);
        metrics.started(&identity).increment(1);
        trace!(
            call_type = %identity.call_type,
            service = %identity.name.service,
            method = %identity.name.method,
            "call started"
        );
        Self {
            metrics,
            identity,
            start,
            error_label_max_length,
        }
    }

    /// Call type, service and method this reporter labels its series with.
    pub fn identity(&self) -> &CallIdentity {
        &self.identity
    }

    /// Count one stream message received from the client.
    pub fn received_message(&self) {
        self.metrics.msg_received(&self.identity).increment(1);
    }

    /// Count one stream message sent to the client.
    pub fn sent_message(&self) {
        self.metrics.msg_sent(&self.identity).increment(1);
    }

    /// Finish the call with a bare status code.
    ///
    /// The `grpc_error` label is always empty.
    pub fn handled(self, code: Code) {
        self.finish(code, String::new());
    }

    /// Finish the call with a structured status.
    ///
    /// Non-OK statuses get a sanitized, truncated slug of the status message
    /// as their `grpc_error` label; OK statuses carry no error.
    pub fn handled_with_status(self, status: &Status) {
        let outcome = match status.code() {
            Code::Ok => String::new(),
            _ => sanitize(status.message(), self.error_label_max_length),
        };
        self.finish(status.code(), outcome);
    }

    fn finish(self, code: Code, outcome: String) {
        trace!(
            service = %self.identity.name.service,
            method = %self.identity.name.method,
            code = ?code,
            outcome = outcome.as_str(),
            "call handled"
        );
        self.metrics
            .handled(&self.identity, code, outcome)
            .increment(1);
        if let Some(start) = self.start {
            self.metrics
                .handling_seconds(&self.identity)
                .record(start.elapsed().as_secs_f64());
        }
    }
}
