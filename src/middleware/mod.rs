// ABOUTME: HTTP middleware forming the relay's request pipeline
// ABOUTME: Security headers, CORS, body limit, rate limiting, authentication, and request ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Bearer token authentication
pub mod auth;
/// Request body ceiling
pub mod body_limit;
/// Cross-origin policy
pub mod cors;
/// Per-address rate limiting
pub mod rate_limiting;
/// Request id propagation
pub mod request_id;
/// Security response headers
pub mod security_headers;

pub use auth::{auth_middleware, bearer_token};
pub use body_limit::{body_limit_layer, disable_extractor_limit, payload_too_large_as_json};
pub use cors::setup_cors;
pub use rate_limiting::{apply_rate_limit_headers, client_ip, headers, rate_limit_middleware};
pub use request_id::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use security_headers::security_headers_middleware;
