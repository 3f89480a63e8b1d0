// ABOUTME: Unified error type and error codes shared by every relay component
// ABOUTME: Maps error codes to HTTP status and renders uniform JSON error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! Every failure in the relay is expressed as an [`AppError`]. The error code
//! decides the HTTP status; the message is what the client sees. Causes from
//! upstream services travel in `source` and are only ever logged.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::FieldError;

/// Standard error codes used throughout the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication
    /// No usable bearer token was presented
    AuthRequired,
    /// The identity service rejected the token
    AuthInvalid,

    // Rate limiting
    /// Source address exceeded its request quota
    RateLimitExceeded,

    // Validation
    /// Request body failed validation
    InvalidInput,
    /// Request body is not well-formed JSON
    InvalidFormat,
    /// Request body exceeds the configured ceiling
    PayloadTooLarge,

    // Resources
    /// No route or resource matched
    ResourceNotFound,

    // External services
    /// An upstream service answered with an error
    ExternalServiceError,
    /// An upstream service could not be reached
    ExternalServiceUnavailable,

    // Internal
    /// Local storage (temporary documents) failed
    StorageError,
    /// Anything else
    InternalError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidFormat => 400,
            Self::AuthRequired | Self::AuthInvalid => 401,
            Self::ResourceNotFound => 404,
            Self::PayloadTooLarge => 413,
            Self::RateLimitExceeded => 429,
            // Upstream failures are reported to clients as plain server errors
            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::StorageError
            | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::RateLimitExceeded => "Rate limit exceeded. Please slow down your requests",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::PayloadTooLarge => "The request body is too large",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::StorageError => "Storage operation failed",
            Self::InternalError => "An internal server error occurred",
        }
    }

    /// Whether this code is a server-side failure
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }
}

/// Unified error type for the relay
#[derive(Debug, Error)]
#[error("{}: {message}", code.description())]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Client-facing message
    pub message: String,
    /// Structured details returned to the client (validation reports only)
    pub details: Value,
    /// Underlying cause, logged server-side and never serialized
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Value::Null,
            source: None,
        }
    }

    /// Attach structured details to the error body
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Missing or malformed Authorization header")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Rate limit exceeded
    #[must_use]
    pub fn rate_limit_exceeded(retry_after_secs: u64) -> Self {
        Self::new(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        )
        .with_details(serde_json::json!({ "retry_after_seconds": retry_after_secs }))
    }

    /// Validation failure with a per-field report
    pub fn validation(message: impl Into<String>, fields: &[FieldError]) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
            .with_details(serde_json::to_value(fields).unwrap_or(Value::Null))
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Body is not well-formed
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Local storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// External service answered with an error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service could not be reached
    pub fn external_unavailable(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Client-facing message
    pub error: String,
    /// Machine-readable error code
    pub code: ErrorCode,
    /// Field-level report for validation failures
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.message.clone(),
            code: error.code,
            details: error.details.clone(),
        }
    }
}

#[cfg(feature = "http-response")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = http::StatusCode::from_u16(self.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR);

        if self.code.is_server_error() {
            tracing::error!(
                code = ?self.code,
                cause = ?self.source,
                "{}",
                self.message
            );
        } else {
            tracing::debug!(code = ?self.code, "{}", self.message);
        }

        (status, axum::Json(ErrorResponse::from(&self))).into_response()
    }
}
