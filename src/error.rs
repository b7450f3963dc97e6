//! Error types for metrics configuration.
//!
//! The per-call reporting path is infallible; only loading and validating
//! configuration can fail.

/// Metrics configuration errors
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),

    #[error("invalid constant label '{name}': {reason}")]
    InvalidLabel { name: String, reason: &'static str },
}

/// Result type alias for metrics configuration operations
pub type Result<T> = std::result::Result<T, MetricsError>;
