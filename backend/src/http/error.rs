//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::repository::RepositoryError;
use crate::db::services::ServiceError;
use crate::scheduling::SchedulingError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Invalid request (validation error)
    BadRequest(String),
    /// Request conflicts with stored state (overlap, full slot, duplicate seat)
    Conflict(String),
    /// Payment was declined
    PaymentRequired(String),
    /// Internal server error
    Internal(String),
    /// Repository error
    Repository(RepositoryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ApiError::new("CONFLICT", msg)),
            AppError::PaymentRequired(msg) => (
                StatusCode::PAYMENT_REQUIRED,
                ApiError::new("PAYMENT_DECLINED", msg),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
            AppError::Repository(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPOSITORY_ERROR", e.to_string()),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Scheduling(e) => match e {
                SchedulingError::Overlap { .. }
                | SchedulingError::CapacityExceeded { .. }
                | SchedulingError::AlreadyBooked { .. } => AppError::Conflict(e.to_string()),
                SchedulingError::Validation(_)
                | SchedulingError::WeekdayMismatch { .. }
                | SchedulingError::NoMatchingDates => AppError::BadRequest(e.to_string()),
            },
            ServiceError::Checkout(e) => AppError::BadRequest(e.to_string()),
            ServiceError::Repository(e) => match e {
                RepositoryError::NotFound(msg) => AppError::NotFound(msg),
                RepositoryError::Conflict { .. } => AppError::Conflict(e.to_string()),
                other => AppError::Repository(other),
            },
            ServiceError::Payment(e) => AppError::PaymentRequired(e.to_string()),
        }
    }
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        AppError::from(ServiceError::Scheduling(err))
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::from(ServiceError::Repository(err))
    }
}
