// ABOUTME: Security response header profiles for the JSON relay API
// ABOUTME: Provides development and production header sets selected by deployment environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Security Headers
//!
//! The relay only serves JSON, so the policy denies framing, content sniffing,
//! and every browser capability. Production adds HSTS.

use crate::config::Environment;
use http::header::{HeaderName, HeaderValue};

/// Security headers configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Content Security Policy header value
    pub csp: &'static str,
    /// X-Frame-Options header value
    pub frame_options: &'static str,
    /// X-Content-Type-Options header value
    pub content_type_options: &'static str,
    /// Referrer-Policy header value
    pub referrer_policy: &'static str,
    /// Permissions-Policy header value
    pub permissions_policy: &'static str,
    /// Strict-Transport-Security header value (HTTPS deployments only)
    pub hsts: Option<&'static str>,
    /// Cross-Origin-Resource-Policy header value
    pub corp: &'static str,
}

const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";
const PERMISSIONS: &str =
    "geolocation=(), microphone=(), camera=(), payment=(), usb=(), accelerometer=(), gyroscope=()";

impl SecurityConfig {
    /// Select the header profile for an environment
    #[must_use]
    pub const fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Development | Environment::Testing => Self::development(),
        }
    }

    /// Development profile: no HSTS since local servers run over plain HTTP
    #[must_use]
    pub const fn development() -> Self {
        Self {
            csp: API_CSP,
            frame_options: "DENY",
            content_type_options: "nosniff",
            referrer_policy: "no-referrer",
            permissions_policy: PERMISSIONS,
            hsts: None,
            corp: "cross-origin",
        }
    }

    /// Production profile
    #[must_use]
    pub const fn production() -> Self {
        Self {
            csp: API_CSP,
            frame_options: "DENY",
            content_type_options: "nosniff",
            referrer_policy: "no-referrer",
            permissions_policy: PERMISSIONS,
            hsts: Some("max-age=31536000; includeSubDomains"),
            corp: "same-site",
        }
    }

    /// Header name/value pairs to set on every response
    #[must_use]
    pub fn header_pairs(&self) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = vec![
            (
                HeaderName::from_static("content-security-policy"),
                HeaderValue::from_static(self.csp),
            ),
            (
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static(self.frame_options),
            ),
            (
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static(self.content_type_options),
            ),
            (
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static(self.referrer_policy),
            ),
            (
                HeaderName::from_static("permissions-policy"),
                HeaderValue::from_static(self.permissions_policy),
            ),
            (
                HeaderName::from_static("cross-origin-resource-policy"),
                HeaderValue::from_static(self.corp),
            ),
        ];

        if let Some(hsts) = self.hsts {
            headers.push((
                HeaderName::from_static("strict-transport-security"),
                HeaderValue::from_static(hsts),
            ));
        }

        headers
    }
}
