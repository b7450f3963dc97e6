//! Server metrics registry.
//!
//! [`ServerMetrics`] owns the five call-metric families and the settings
//! that shape them. It is built once at process start and shared (behind an
//! `Arc`) with every [`CallReporter`]. Storage and export belong to the
//! injected `metrics` recorder; this type only decides names and labels.
//!
//! # Label families
//!
//! ```text
//!  grpc_server_started_total       ┐
//!  grpc_server_msg_received_total  ├─ (grpc_type, grpc_service, grpc_method)
//!  grpc_server_msg_sent_total      │
//!  grpc_server_handling_seconds    ┘
//!  grpc_server_handled_total       ── (grpc_type, grpc_service, grpc_method,
//!                                      grpc_code, grpc_error)
//! ```
//!
//! The histogram deliberately omits `grpc_code`: codes multiplied by
//! latency buckets would blow up series counts.

use std::sync::Arc;

use metrics::{
    Counter, Histogram, Key, KeyName, Label, Level, Metadata, Recorder, SharedString, Unit,
};
use tonic::Code;
use tracing::debug;

use crate::call::{CallIdentity, CallType};
use crate::config::MetricsConfig;
use crate::error::Result;
use crate::reporter::CallReporter;
use crate::status::{ALL_CODES, code_label};
use crate::telemetry;

fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}

/// Recorder that forwards to the process-wide `metrics` recorder.
///
/// Resolves the recorder on every registration, so a recorder installed
/// after the registry was built (or a thread-local one set through
/// `metrics::with_local_recorder`) is still picked up. With nothing
/// installed, all calls are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalRecorder;

impl Recorder for GlobalRecorder {
    fn describe_counter(&self, key: KeyName, unit: Option<Unit>, description: SharedString) {
        metrics::with_recorder(|r| r.describe_counter(key, unit, description));
    }

    fn describe_gauge(&self, key: KeyName, unit: Option<Unit>, description: SharedString) {
        metrics::with_recorder(|r| r.describe_gauge(key, unit, description));
    }

    fn describe_histogram(&self, key: KeyName, unit: Option<Unit>, description: SharedString) {
        metrics::with_recorder(|r| r.describe_histogram(key, unit, description));
    }

    fn register_counter(&self, key: &Key, metadata: &Metadata<'_>) -> Counter {
        metrics::with_recorder(|r| r.register_counter(key, metadata))
    }

    fn register_gauge(&self, key: &Key, metadata: &Metadata<'_>) -> metrics::Gauge {
        metrics::with_recorder(|r| r.register_gauge(key, metadata))
    }

    fn register_histogram(&self, key: &Key, metadata: &Metadata<'_>) -> Histogram {
        metrics::with_recorder(|r| r.register_histogram(key, metadata))
    }
}

/// Registry of server-side call metrics.
pub struct ServerMetrics {
    recorder: Arc<dyn Recorder + Send + Sync>,
    config: MetricsConfig,
    const_labels: Vec<Label>,
}

impl std::fmt::Debug for ServerMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerMetrics")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ServerMetrics {
    /// Build a registry that reports to the process-wide recorder.
    pub fn new(config: MetricsConfig) -> Result<Self> {
        Self::with_recorder(config, Arc::new(GlobalRecorder))
    }

    /// Build a registry that reports to an explicit recorder.
    pub fn with_recorder(
        config: MetricsConfig,
        recorder: Arc<dyn Recorder + Send + Sync>,
    ) -> Result<Self> {
        config.validate()?;
        let const_labels = config
            .const_labels
            .iter()
            .map(|(k, v)| Label::new(k.clone(), v.clone()))
            .collect();
        debug!(
            handling_time_histogram = config.handling_time_histogram,
            error_label_max_length = config.error_label_max_length,
            const_labels = config.const_labels.len(),
            "server metrics registry built"
        );
        Ok(Self {
            recorder,
            config,
            const_labels,
        })
    }

    /// Whether per-call latency is recorded.
    pub fn handling_time_histogram_enabled(&self) -> bool {
        self.config.handling_time_histogram
    }

    /// Maximum length of the `grpc_error` label.
    pub fn error_label_max_length(&self) -> u8 {
        self.config.error_label_max_length
    }

    /// Configured latency bucket boundaries, for exporter setup.
    pub fn histogram_buckets(&self) -> &[f64] {
        &self.config.histogram_buckets
    }

    /// The configuration this registry was built with.
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Start reporting a call, using the configured outcome label length.
    pub fn reporter(self: &Arc<Self>, call_type: CallType, full_method: &str) -> CallReporter {
        CallReporter::new(
            Arc::clone(self),
            call_type,
            full_method,
            self.config.error_label_max_length,
        )
    }

    /// Register help text and units for every family with the recorder.
    pub fn describe(&self) {
        let r = &self.recorder;
        r.describe_counter(
            KeyName::from(telemetry::STARTED_TOTAL),
            None,
            SharedString::from(telemetry::STARTED_HELP),
        );
        r.describe_counter(
            KeyName::from(telemetry::HANDLED_TOTAL),
            None,
            SharedString::from(telemetry::HANDLED_HELP),
        );
        r.describe_counter(
            KeyName::from(telemetry::MSG_RECEIVED_TOTAL),
            None,
            SharedString::from(telemetry::MSG_RECEIVED_HELP),
        );
        r.describe_counter(
            KeyName::from(telemetry::MSG_SENT_TOTAL),
            None,
            SharedString::from(telemetry::MSG_SENT_HELP),
        );
        if self.config.handling_time_histogram {
            r.describe_histogram(
                KeyName::from(telemetry::HANDLING_SECONDS),
                Some(Unit::Seconds),
                SharedString::from(telemetry::HANDLING_HELP),
            );
        }
    }

    /// Create every series at zero for the given methods.
    ///
    /// Takes `(call type, full method path)` pairs, typically one per method
    /// of every registered service. Series for handled calls are created for
    /// each canonical status code with an empty `grpc_error` label.
    pub fn initialize_metrics<'a, I>(&self, methods: I)
    where
        I: IntoIterator<Item = (CallType, &'a str)>,
    {
        let mut count = 0usize;
        for (call_type, full_method) in methods {
            let id = CallIdentity::new(call_type, full_method);
            self.started(&id).increment(0);
            self.msg_received(&id).increment(0);
            self.msg_sent(&id).increment(0);
            if self.config.handling_time_histogram {
                // Registered only; a zero observation would skew the buckets.
                let _histogram = self.handling_seconds(&id);
            }
            for code in ALL_CODES {
                self.handled(&id, code, String::new()).increment(0);
            }
            count += 1;
        }
        debug!(methods = count, "call metrics pre-initialized");
    }

    pub(crate) fn started(&self, id: &CallIdentity) -> Counter {
        self.counter(telemetry::STARTED_TOTAL, self.identity_labels(id))
    }

    pub(crate) fn msg_received(&self, id: &CallIdentity) -> Counter {
        self.counter(telemetry::MSG_RECEIVED_TOTAL, self.identity_labels(id))
    }

    pub(crate) fn msg_sent(&self, id: &CallIdentity) -> Counter {
        self.counter(telemetry::MSG_SENT_TOTAL, self.identity_labels(id))
    }

    pub(crate) fn handled(&self, id: &CallIdentity, code: Code, outcome: String) -> Counter {
        let mut labels = self.identity_labels(id);
        labels.push(Label::new(telemetry::LABEL_CODE, code_label(code)));
        labels.push(Label::new(telemetry::LABEL_ERROR, outcome));
        self.counter(telemetry::HANDLED_TOTAL, labels)
    }

    pub(crate) fn handling_seconds(&self, id: &CallIdentity) -> Histogram {
        let key = Key::from_parts(telemetry::HANDLING_SECONDS, self.identity_labels(id));
        self.recorder.register_histogram(&key, &metadata())
    }

    fn counter(&self, name: &'static str, labels: Vec<Label>) -> Counter {
        let key = Key::from_parts(name, labels);
        self.recorder.register_counter(&key, &metadata())
    }

    fn identity_labels(&self, id: &CallIdentity) -> Vec<Label> {
        let mut labels = Vec::with_capacity(5 + self.const_labels.len());
        labels.push(Label::new(telemetry::LABEL_TYPE, id.call_type.as_str()));
        labels.push(Label::new(telemetry::LABEL_SERVICE, id.name.service.clone()));
        labels.push(Label::new(telemetry::LABEL_METHOD, id.name.method.clone()));
        labels.extend(self.const_labels.iter().cloned());
        labels
    }
}
