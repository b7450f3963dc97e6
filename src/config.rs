//! Configuration for server call metrics.
//!
//! Typically embedded in a server's TOML config under a `[metrics]` table:
//!
//! ```toml
//! handling_time_histogram = true
//! error_label_max_length = 32
//! histogram_buckets = [0.01, 0.1, 1.0]
//!
//! [const_labels]
//! region = "eu-west-1"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MetricsError, Result};
use crate::telemetry;

/// Call metrics configuration. Fixed once the registry is built.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsConfig {
    /// Record per-call latency into `grpc_server_handling_seconds` (default: false).
    #[serde(default)]
    pub handling_time_histogram: bool,
    /// Bucket boundaries for the latency histogram, handed to the exporter.
    #[serde(default = "default_buckets")]
    pub histogram_buckets: Vec<f64>,
    /// Maximum length in characters of the `grpc_error` label (default: 0,
    /// which leaves the label empty).
    #[serde(default)]
    pub error_label_max_length: u8,
    /// Labels appended to every series.
    #[serde(default)]
    pub const_labels: BTreeMap<String, String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            handling_time_histogram: false,
            histogram_buckets: default_buckets(),
            error_label_max_length: 0,
            const_labels: BTreeMap::new(),
        }
    }
}

fn default_buckets() -> Vec<f64> {
    vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
}

const RESERVED_LABELS: &[&str] = &[
    telemetry::LABEL_TYPE,
    telemetry::LABEL_SERVICE,
    telemetry::LABEL_METHOD,
    telemetry::LABEL_CODE,
    telemetry::LABEL_ERROR,
];

impl MetricsConfig {
    /// Enable the latency histogram.
    pub fn with_handling_time_histogram(mut self, enabled: bool) -> Self {
        self.handling_time_histogram = enabled;
        self
    }

    /// Set custom histogram bucket boundaries.
    pub fn with_buckets(mut self, buckets: impl Into<Vec<f64>>) -> Self {
        self.histogram_buckets = buckets.into();
        self
    }

    /// Set the maximum outcome label length.
    pub fn with_error_label_max_length(mut self, max_len: u8) -> Self {
        self.error_label_max_length = max_len;
        self
    }

    /// Add a constant label.
    pub fn with_const_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.const_labels.insert(name.into(), value.into());
        self
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| MetricsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check bucket boundaries and constant label names.
    pub fn validate(&self) -> Result<()> {
        if self.handling_time_histogram {
            if self.histogram_buckets.is_empty() {
                return Err(MetricsError::InvalidBuckets(
                    "at least one bucket is required".to_string(),
                ));
            }
            if let Some(b) = self.histogram_buckets.iter().find(|b| !b.is_finite()) {
                return Err(MetricsError::InvalidBuckets(format!(
                    "bucket {b} is not finite"
                )));
            }
            if let Some(w) = self.histogram_buckets.windows(2).find(|w| w[0] >= w[1]) {
                return Err(MetricsError::InvalidBuckets(format!(
                    "buckets must be strictly increasing ({} >= {})",
                    w[0], w[1]
                )));
            }
        }

        for name in self.const_labels.keys() {
            validate_label_name(name)?;
        }
        Ok(())
    }
}

fn validate_label_name(name: &str) -> Result<()> {
    let invalid = |reason| {
        Err(MetricsError::InvalidLabel {
            name: name.to_owned(),
            reason,
        })
    };
    let mut chars = name.chars();
    match chars.next() {
        None => return invalid("name is empty"),
        Some(c) if !(c.is_ascii_alphabetic() || c == '_') => {
            return invalid("must start with a letter or underscore");
        }
        _ => {}
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return invalid("may only contain [a-zA-Z0-9_]");
    }
    if name.starts_with("__") {
        return invalid("names starting with '__' are reserved");
    }
    if RESERVED_LABELS.contains(&name) {
        return invalid("collides with a per-call label");
    }
    Ok(())
}
