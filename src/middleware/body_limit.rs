// ABOUTME: Request body size ceiling with a JSON rejection body
// ABOUTME: Wraps tower-http's RequestBodyLimitLayer and rewrites its plain-text 413 responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use http::{header::CONTENT_TYPE, StatusCode};
use pierre_relay_core::errors::{AppError, ErrorCode};
use tower_http::limit::RequestBodyLimitLayer;

/// Client-facing message for oversized bodies
pub const PAYLOAD_TOO_LARGE: &str = "Request body too large";

/// Layer rejecting bodies larger than `limit_bytes`
///
/// Declared lengths are rejected before the request reaches any inner
/// layer; streamed bodies fail when a handler buffers them.
#[must_use]
pub fn body_limit_layer(limit_bytes: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(limit_bytes)
}

/// Turn off axum's built-in extractor ceiling so the configured limit is the only one
#[must_use]
pub fn disable_extractor_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::disable()
}

/// Replace non-JSON 413 responses with the relay's error body
pub async fn payload_too_large_as_json(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::new(ErrorCode::PayloadTooLarge, PAYLOAD_TOO_LARGE).into_response();
    }
    response
}
