//! Telemetry metric name constants.
//!
//! Centralised metric and label names for server-side call metrics.
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd)
//! or inject one into [`ServerMetrics`](crate::ServerMetrics); without a
//! recorder, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `grpc_server_`. Counters end in `_total`,
//! the latency histogram is in `_seconds`.
//!
//! # Common labels
//!
//! - `grpc_type` — call type: "unary", "client_stream", "server_stream", "bidi_stream"
//! - `grpc_service` — fully-qualified service name (e.g. "pkg.Greeter")
//! - `grpc_method` — method name (e.g. "SayHello")
//! - `grpc_code` — canonical status code name (handled counter only)
//! - `grpc_error` — sanitized outcome label (handled counter only)

/// Total calls started on the server.
///
/// Labels: `grpc_type`, `grpc_service`, `grpc_method`.
pub const STARTED_TOTAL: &str = "grpc_server_started_total";

/// Total calls completed on the server, regardless of outcome.
///
/// Labels: `grpc_type`, `grpc_service`, `grpc_method`, `grpc_code`, `grpc_error`.
pub const HANDLED_TOTAL: &str = "grpc_server_handled_total";

/// Total stream messages received by the server.
///
/// Labels: `grpc_type`, `grpc_service`, `grpc_method`.
pub const MSG_RECEIVED_TOTAL: &str = "grpc_server_msg_received_total";

/// Total stream messages sent by the server.
///
/// Labels: `grpc_type`, `grpc_service`, `grpc_method`.
pub const MSG_SENT_TOTAL: &str = "grpc_server_msg_sent_total";

/// Time from call start to terminal status, in seconds.
///
/// Labels: `grpc_type`, `grpc_service`, `grpc_method`.
pub const HANDLING_SECONDS: &str = "grpc_server_handling_seconds";

pub const LABEL_TYPE: &str = "grpc_type";
pub const LABEL_SERVICE: &str = "grpc_service";
pub const LABEL_METHOD: &str = "grpc_method";
pub const LABEL_CODE: &str = "grpc_code";
pub const LABEL_ERROR: &str = "grpc_error";

pub(crate) const STARTED_HELP: &str = "Total number of RPCs started on the server.";
pub(crate) const HANDLED_HELP: &str =
    "Total number of RPCs completed on the server, regardless of success or failure.";
pub(crate) const MSG_RECEIVED_HELP: &str =
    "Total number of RPC stream messages received on the server.";
pub(crate) const MSG_SENT_HELP: &str = "Total number of gRPC stream messages sent by the server.";
pub(crate) const HANDLING_HELP: &str =
    "Histogram of response latency (seconds) of gRPC that had been application-level handled by the server.";
