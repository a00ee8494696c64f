// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent page responses.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required form field is empty or malformed.
    #[error("{0}")]
    Validation(String),

    /// Credentials rejected or account conflict.
    #[error("{0}")]
    Auth(String),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any failure talking to the storage or identity backend.
    #[error("{0}")]
    Backend(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Whether the error should be shown to the user inline rather than as an error page.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Auth(_) | AppError::Backend(_)
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Backend(msg) => {
                tracing::error!(error = %msg, "Backend error");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong. Please try again.".to_string(),
                )
            }
        };

        (status, Html(crate::pages::error_page(status, &message))).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
