use thiserror::Error;

pub type Result<T> = std::result::Result<T, SeriesError>;

/// Errors raised while parsing a series or validating a computation request.
///
/// The transform itself is total: `compute_segments` never fails. Only strict
/// parsing and the profile boundary produce errors.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("invalid value: '{0}' is not a number")]
    InvalidValue(String),

    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints { required: usize, actual: usize },

    #[error("non-finite value {value} at point {position}")]
    NonFiniteValue { position: usize, value: f64 },

    #[error("segment {index} produced a non-finite metric")]
    NonFiniteMetric { index: usize },

    #[error("invalid denominator: {0} (must be > 0)")]
    InvalidDenominator(f64),

    #[error("unknown parse mode '{0}' (expected 'permissive' or 'strict')")]
    UnknownParseMode(String),

    #[error("snapshot failed")]
    Snapshot(#[from] serde_json::Error),
}
