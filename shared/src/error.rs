//! Error kinds raised by the estimation engine

use thiserror::Error;

/// Errors produced while loading records or estimating a scenario.
///
/// None of these abort a session. `MissingData` marks a value that cannot be
/// computed and must be shown as "not applicable", never as zero.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("missing or invalid `{field}` for {entity}")]
    MissingData { entity: String, field: &'static str },

    #[error("site `{site}` is not part of the current living lab")]
    ScopeMismatch { site: String },

    #[error("unknown strategy `{key}`")]
    UnknownStrategy { key: String },

    #[error("assumption `{field}` must be a finite, non-negative number (got {value})")]
    InvalidAssumption { field: &'static str, value: f64 },

    #[error("no applied strategy at index {index} (list has {len})")]
    ApplicationIndex { index: usize, len: usize },

    #[error("invalid data document: {0}")]
    Parse(String),
}

impl EstimateError {
    pub fn missing(entity: impl Into<String>, field: &'static str) -> Self {
        EstimateError::MissingData {
            entity: entity.into(),
            field,
        }
    }
}

impl From<serde_json::Error> for EstimateError {
    fn from(err: serde_json::Error) -> Self {
        EstimateError::Parse(err.to_string())
    }
}

/// Result alias used throughout the engine
pub type EstimateResult<T> = Result<T, EstimateError>;
