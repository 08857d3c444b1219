//! Unified API error handling
//!
//! Every endpoint returns `Result<T, ApiError>` so failures share one JSON shape.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbError;
use crate::service::claims::ClaimValidationError;
use crate::service::study::StudyServiceError;
use crate::service::summary::SummaryError;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Bad request / validation error (400)
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        if status.is_server_error() {
            tracing::error!(
                error_type = error_type,
                status = status.as_u16(),
                message = %self,
                "API error"
            );
        } else {
            tracing::debug!(
                error_type = error_type,
                status = status.as_u16(),
                message = %self,
                "API request rejected"
            );
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

impl From<ClaimValidationError> for ApiError {
    fn from(err: ClaimValidationError) -> Self {
        match err {
            ClaimValidationError::InvalidClaim(msg) => ApiError::BadRequest(msg),
            e => ApiError::Internal(format!("Failed to validate claim: {}", e)),
        }
    }
}

impl From<StudyServiceError> for ApiError {
    fn from(err: StudyServiceError) -> Self {
        match err {
            e @ StudyServiceError::NotFound(_) => ApiError::NotFound(e.to_string()),
            e @ (StudyServiceError::DuplicateDoi(_) | StudyServiceError::InvalidQuery(_)) => {
                ApiError::BadRequest(e.to_string())
            }
            StudyServiceError::DbError(e) => e.into(),
        }
    }
}

impl From<SummaryError> for ApiError {
    fn from(err: SummaryError) -> Self {
        match err {
            e @ (SummaryError::StudyNotFound(_) | SummaryError::SummaryNotFound(_)) => {
                ApiError::NotFound(e.to_string())
            }
            e @ SummaryError::Generation(_) => ApiError::Internal(e.to_string()),
            SummaryError::DbError(e) => e.into(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(id) => ApiError::NotFound(id),
            DbError::Duplicate(msg) => ApiError::BadRequest(msg),
            e => ApiError::Database(e.to_string()),
        }
    }
}
