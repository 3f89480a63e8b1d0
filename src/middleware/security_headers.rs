// ABOUTME: Middleware applying the environment's security header profile to every response
// ABOUTME: Runs outermost so error, rate-limit, and fallback responses carry the headers too
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::server::ServerResources;

/// Add security headers without overriding any a handler already set
pub async fn security_headers_middleware(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    for (name, value) in resources.security.header_pairs() {
        headers.entry(name).or_insert(value);
    }

    response
}
