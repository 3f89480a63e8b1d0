// ABOUTME: Bearer token authentication middleware for protected routes
// ABOUTME: Resolves the caller through the IdentityVerifier and attaches AuthenticatedUser to the request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{header::AUTHORIZATION, HeaderMap};
use pierre_relay_core::constants::messages;
use pierre_relay_core::errors::{AppError, ErrorCode};

use crate::logging::AppLogger;
use crate::server::ServerResources;

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme is matched case-insensitively; an empty token counts as missing.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Require a valid bearer token before the route runs
///
/// Missing or malformed headers and rejected tokens yield 401. When the
/// identity service cannot be reached the caller gets a generic 500 and
/// the cause is only logged.
#[tracing::instrument(
    skip_all,
    fields(user_id = tracing::field::Empty, success = tracing::field::Empty)
)]
pub async fn auth_middleware(
    State(resources): State<Arc<ServerResources>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()) else {
        tracing::Span::current().record("success", false);
        AppLogger::log_auth_event(None, "missing_bearer_token", false);
        return AppError::auth_required().into_response();
    };

    let verified = resources.verifier.verify(token).await;
    match verified {
        Ok(Some(user)) => {
            tracing::Span::current()
                .record("user_id", user.id.as_str())
                .record("success", true);
            AppLogger::log_auth_event(Some(&user.id), "token_verified", true);
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => {
            tracing::Span::current().record("success", false);
            AppLogger::log_auth_event(None, "token_rejected", false);
            AppError::auth_invalid(messages::AUTH_FAILED).into_response()
        }
        Err(e) => {
            tracing::Span::current().record("success", false);
            AppError::new(
                ErrorCode::ExternalServiceUnavailable,
                messages::AUTH_SERVICE_FAILED,
            )
            .with_source(e)
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn test_malformed_headers_rejected() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer   ")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("abc")), None);
    }
}
