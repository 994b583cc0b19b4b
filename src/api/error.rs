use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use super::validation::FieldError;
use crate::services::{RegistrationError, ReportError, UserError, WorkshopError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    /// Payload failed validation; one entry per offending field.
    InvalidData(Vec<FieldError>),

    Conflict(String),

    InternalError(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<FieldError>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InvalidData(details) => {
                write!(f, "Invalid data: {} field(s) rejected", details.len())
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                    Vec::new(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::InvalidData(details) => (
                StatusCode::BAD_REQUEST,
                "Invalid data".to_string(),
                details,
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    Vec::new(),
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<WorkshopError> for ApiError {
    fn from(err: WorkshopError) -> Self {
        match err {
            WorkshopError::NotFound(id) => Self::not_found("Workshop", id),
            WorkshopError::SeatsBelowRegistered { .. } => {
                Self::InvalidData(vec![FieldError::new("seats", err.to_string())])
            }
            WorkshopError::Database(msg) => Self::DatabaseError(msg),
            WorkshopError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::NotFound(id) => Self::not_found("Registration", id),
            RegistrationError::WorkshopNotFound(id) => Self::not_found("Workshop", id),
            RegistrationError::UserNotFound(id) => Self::not_found("User", id),
            RegistrationError::WorkshopClosed { .. }
            | RegistrationError::FullyBooked { .. }
            | RegistrationError::AlreadyRegistered { .. }
            | RegistrationError::InvalidTransition { .. } => Self::Conflict(err.to_string()),
            RegistrationError::Database(msg) => Self::DatabaseError(msg),
            RegistrationError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => Self::not_found("User", id),
            UserError::UsernameNotFound(name) => Self::not_found("User", name),
            UserError::UsernameTaken(_) | UserError::EmailTaken(_) => {
                Self::Conflict(err.to_string())
            }
            UserError::Database(msg) => Self::DatabaseError(msg),
            UserError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Database(msg) => Self::DatabaseError(msg),
            ReportError::Internal(msg) => Self::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
