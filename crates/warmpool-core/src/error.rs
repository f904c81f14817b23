//! Error types for warmpool configuration and trace handling.
//!
//! Recording events and computing targets never fail; only the edges that
//! read external input return these.

use thiserror::Error;

/// Result type alias for fallible warmpool operations.
pub type WarmPoolResult<T> = Result<T, WarmPoolError>;

#[derive(Debug, Error)]
pub enum WarmPoolError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("config serialize error: {0}")]
    ConfigSerialize(String),

    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("trace line {line}: {message}")]
    TraceParse { line: usize, message: String },
}
