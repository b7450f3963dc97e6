//! grpc-call-metrics - Per-call metrics for gRPC servers
//!
//! This crate records started/handled counts, optional latency histograms
//! and per-message stream counts for every call a gRPC server serves,
//! labelled by call type, service, method and outcome. Observations go
//! through the [`metrics`] facade, so any recorder (prometheus, statsd,
//! ...) can store and export them.
//!
//! The call-handling layer (an interceptor or tower layer) owns one
//! [`ServerMetrics`] for the process and creates a [`CallReporter`] per call.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use grpc_call_metrics::{CallType, MetricsConfig, ServerMetrics};
//! use tonic::Status;
//!
//! # fn main() -> grpc_call_metrics::Result<()> {
//! let config = MetricsConfig::default()
//!     .with_handling_time_histogram(true)
//!     .with_error_label_max_length(16);
//! let metrics = Arc::new(ServerMetrics::new(config)?);
//! metrics.describe();
//!
//! let reporter = metrics.reporter(CallType::Unary, "/pkg.Greeter/SayHello");
//! reporter.received_message();
//! reporter.handled_with_status(&Status::invalid_argument("Bad Request!!"));
//! # Ok(())
//! # }
//! ```

pub mod call;
pub mod config;
pub mod error;
pub mod registry;
pub mod reporter;
pub mod sanitize;
pub mod status;
pub mod telemetry;

pub use call::{CallIdentity, CallType, MethodName};
pub use config::MetricsConfig;
pub use error::{MetricsError, Result};
pub use registry::{GlobalRecorder, ServerMetrics};
pub use reporter::CallReporter;
pub use sanitize::sanitize;
pub use status::code_label;
