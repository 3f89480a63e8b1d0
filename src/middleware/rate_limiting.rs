// ABOUTME: Rate limiting middleware enforcing the per-address quota on every route
// ABOUTME: Adds standard rate limit headers to all responses and returns 429 with Retry-After
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Rate Limiting Middleware with HTTP Headers
//!
//! Applied before authentication, so the quota is counted per source
//! address whether or not the caller is authenticated and whatever route
//! is targeted.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{HeaderMap, HeaderValue};
use pierre_relay_core::errors::AppError;

use crate::logging::AppLogger;
use crate::rate_limiting::RateLimitStatus;
use crate::server::ServerResources;

/// HTTP header names for rate limiting
pub mod headers {
    /// Maximum requests allowed in the current window
    pub const X_RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
    /// Remaining requests in the current window
    pub const X_RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
    /// Unix timestamp when the window resets
    pub const X_RATE_LIMIT_RESET: &str = "x-ratelimit-reset";
    /// Draft-standard quota header
    pub const RATE_LIMIT_LIMIT: &str = "ratelimit-limit";
    /// Draft-standard remaining header
    pub const RATE_LIMIT_REMAINING: &str = "ratelimit-remaining";
    /// Draft-standard reset header (seconds until reset)
    pub const RATE_LIMIT_RESET: &str = "ratelimit-reset";
    /// Seconds to wait before retrying
    pub const RETRY_AFTER: &str = "retry-after";
}

/// Header used to find the client behind a trusted proxy
const FORWARDED_FOR: &str = "x-forwarded-for";

/// Write the rate limit headers for `status` into `target`
pub fn apply_rate_limit_headers(target: &mut HeaderMap, status: &RateLimitStatus) {
    let values = [
        (headers::X_RATE_LIMIT_LIMIT, status.limit.to_string()),
        (headers::X_RATE_LIMIT_REMAINING, status.remaining.to_string()),
        (headers::X_RATE_LIMIT_RESET, status.reset_at.to_string()),
        (headers::RATE_LIMIT_LIMIT, status.limit.to_string()),
        (headers::RATE_LIMIT_REMAINING, status.remaining.to_string()),
        (headers::RATE_LIMIT_RESET, status.retry_after_seconds.to_string()),
    ];

    for (name, value) in values {
        if let Ok(header_value) = HeaderValue::from_str(&value) {
            target.insert(name, header_value);
        }
    }

    if status.is_limited {
        if let Ok(header_value) = HeaderValue::from_str(&status.retry_after_seconds.to_string()) {
            target.insert(headers::RETRY_AFTER, header_value);
        }
    }
}

/// Resolve the address a request is counted against
///
/// Uses the first `X-Forwarded-For` entry only when the proxy is trusted,
/// then the socket peer address, then localhost when neither is available.
#[must_use]
pub fn client_ip(request: &Request, trust_proxy: bool) -> IpAddr {
    if trust_proxy {
        let forwarded = request
            .headers()
            .get(FORWARDED_FOR)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::LOCALHOST), |ConnectInfo(addr)| addr.ip())
}

/// Count the request against its source address and reject it once over quota
pub async fn rate_limit_middleware(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let limiter = &resources.rate_limiter;
    let ip = client_ip(&request, limiter.config().trust_proxy);
    let status = limiter.check(ip);

    let mut response = if status.is_limited {
        AppLogger::log_security_event(
            "rate_limit_exceeded",
            &format!("{} {}", request.method(), request.uri().path()),
            Some(&ip.to_string()),
        );
        AppError::rate_limit_exceeded(status.retry_after_seconds).into_response()
    } else {
        next.run(request).await
    };

    apply_rate_limit_headers(response.headers_mut(), &status);
    response
}
