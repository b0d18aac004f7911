//! HTTP error handling and response conversion.
//!
//! Every failure leaves a handler as an [`AppError`], which decides the status
//! code, a user-safe message and the log level. Bodies are always
//! `{"error": "<message>"}`; the status code is the machine-readable kind.

use crate::domain::shared::errors::DomainError;
use axum::{
    Json,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request or failed validation (400).
    BadRequest(String),

    /// Missing or unresolvable admin identity (401).
    Unauthorized,

    /// Resource not found (404).
    NotFound(String),

    /// Upload above the size ceiling (413).
    PayloadTooLarge(String),

    /// Image that cannot be decoded or has a disallowed type (415).
    UnsupportedMediaType(String),

    /// Rate limit exceeded (429).
    RateLimited,

    /// Feature switched off by configuration or settings (503).
    ServiceUnavailable(String),

    /// Record store, object store or other adapter failure (500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::NotFound(msg) => write!(f, "Not found: {}", msg),
            Self::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            Self::UnsupportedMediaType(msg) => write!(f, "Unsupported media type: {}", msg),
            Self::RateLimited => write!(f, "Rate limit exceeded"),
            Self::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-safe error message (without implementation details).
    fn user_message(&self) -> String {
        match self {
            Self::BadRequest(msg) => msg.clone(),
            Self::Unauthorized => "Unauthorized".into(),
            Self::NotFound(msg) => msg.clone(),
            Self::PayloadTooLarge(msg) => msg.clone(),
            Self::UnsupportedMediaType(msg) => msg.clone(),
            Self::RateLimited => "Too many requests, please try again later".into(),
            Self::ServiceUnavailable(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.user_message();

        if status.is_server_error() {
            tracing::error!("error={}", self);
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            tracing::debug!("error={}", self);
        } else {
            tracing::warn!("error={}", self);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

// === Domain Error Conversion ===

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::MissingFile => AppError::BadRequest("A photo file is required".into()),
            DomainError::PayloadTooLarge(msg) => AppError::PayloadTooLarge(msg),
            DomainError::UnsupportedMediaType(msg) => AppError::UnsupportedMediaType(msg),
            DomainError::TooManyRequests => AppError::RateLimited,
            DomainError::ServiceUnavailable(msg) => AppError::ServiceUnavailable(msg),
            DomainError::NotFound(msg) => AppError::NotFound(msg),
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::InfrastructureError(msg) => {
                tracing::error!(infrastructure_error = %msg);
                AppError::Internal(msg)
            }
        }
    }
}

// === Extractor Rejections ===

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(err: MultipartRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Upload exceeds the request size limit".into())
        } else {
            AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}
