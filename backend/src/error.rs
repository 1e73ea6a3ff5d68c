//! Error handling for the WEFE dashboard server
//!
//! Every failure leaves the server as a JSON `{error: {code, message, field}}`
//! body with a matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use wefe_shared::EstimateError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Estimation errors
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    // Internal errors
    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

fn estimate_error_detail(err: &EstimateError) -> (StatusCode, ErrorDetail) {
    let (status, code, field) = match err {
        EstimateError::MissingData { field, .. } => {
            (StatusCode::BAD_REQUEST, "MISSING_DATA", Some(field.to_string()))
        }
        EstimateError::InvalidAssumption { field, .. } => (
            StatusCode::BAD_REQUEST,
            "INVALID_ASSUMPTION",
            Some(field.to_string()),
        ),
        EstimateError::UnknownStrategy { .. } => {
            (StatusCode::NOT_FOUND, "UNKNOWN_STRATEGY", Some("strategy".to_string()))
        }
        EstimateError::ScopeMismatch { .. } => {
            (StatusCode::NOT_FOUND, "SCOPE_MISMATCH", Some("scope".to_string()))
        }
        EstimateError::ApplicationIndex { .. } => {
            (StatusCode::NOT_FOUND, "APPLICATION_NOT_FOUND", None)
        }
        EstimateError::Parse(_) => (StatusCode::BAD_REQUEST, "PARSE_ERROR", None),
    };
    (
        status,
        ErrorDetail {
            code: code.to_string(),
            message: err.to_string(),
            field,
        },
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Estimate(err) => estimate_error_detail(err),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_error_status() {
        let cases = [
            (EstimateError::missing("Maize", "space_m2_per_seed"), StatusCode::BAD_REQUEST),
            (
                EstimateError::InvalidAssumption {
                    field: "water_gain_l_per_m2",
                    value: -1.0,
                },
                StatusCode::BAD_REQUEST,
            ),
            (EstimateError::UnknownStrategy { key: "x".into() }, StatusCode::NOT_FOUND),
            (EstimateError::ScopeMismatch { site: "x".into() }, StatusCode::NOT_FOUND),
            (EstimateError::ApplicationIndex { index: 3, len: 1 }, StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_validation_status() {
        let response = AppError::validation("water", "Share values must be between 0 and 100").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("Session".into()).into_response().status(), StatusCode::NOT_FOUND);
    }
}
