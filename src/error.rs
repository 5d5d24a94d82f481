use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::permissions::Permission;
use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum AppError {
    /// No valid session could be resolved. Missing, expired and tampered
    /// tokens all collapse into this one variant.
    #[error("Authentication required")]
    Unauthenticated,

    /// Wrong email/password pair at login. Same client-visible outcome for
    /// unknown email, wrong password and deactivated account.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Session exists but lacks the required capability.
    #[error("Permission denied: {0}")]
    PermissionDenied(Permission),

    /// Too many failed login attempts; actionable, so surfaced distinctly.
    #[error("Account temporarily locked")]
    AccountLocked,

    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Internal error: {0}")]
    Internal(anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages = Vec::new();
        for (field, errs) in errors.field_errors() {
            for err in errs {
                match &err.message {
                    Some(message) => messages.push(message.to_string()),
                    None => messages.push(format!("{}: {}", field, err.code)),
                }
            }
        }
        messages.sort();
        AppError::Validation(messages)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Authentication required"}),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({"error": "Invalid email or password"}),
            ),
            AppError::PermissionDenied(permission) => {
                // The specific missing permission stays in the server log
                tracing::warn!(permission = %permission, "permission denied");
                (
                    StatusCode::FORBIDDEN,
                    json!({"error": "Insufficient permissions"}),
                )
            }
            AppError::AccountLocked => (
                StatusCode::LOCKED,
                json!({"error": "Account temporarily locked. Try again later."}),
            ),
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"error": "Validation failed", "details": errors}),
            ),
            AppError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                json!({"error": format!("{entity} not found")}),
            ),
            AppError::Conflict(message) => (StatusCode::CONFLICT, json!({"error": message})),
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "An unexpected error occurred. Please try again later."}),
                )
            }
            AppError::Auth(e) => {
                tracing::error!(error = %e, "auth primitive failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "An unexpected error occurred. Please try again later."}),
                )
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "An unexpected error occurred. Please try again later."}),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
