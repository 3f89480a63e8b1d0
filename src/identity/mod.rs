// ABOUTME: Bearer token verification against an external identity service
// ABOUTME: Defines the IdentityVerifier seam plus Supabase and caching implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Identity Verification
//!
//! The relay never issues or decodes tokens itself. Each bearer token is
//! handed to an [`IdentityVerifier`], which either resolves it to an
//! [`AuthenticatedUser`] or rejects it.
//!
//! Verification has three outcomes:
//! - `Ok(Some(user))`: the token is valid
//! - `Ok(None)`: the identity service rejected the token (client gets 401)
//! - `Err(_)`: the identity service could not be reached (client gets a generic 500)

use async_trait::async_trait;
use pierre_relay_core::errors::AppResult;
use pierre_relay_core::models::AuthenticatedUser;

/// TTL cache decorator for any verifier
pub mod cache;
/// Supabase Auth verifier
pub mod supabase;

pub use cache::CachingVerifier;
pub use supabase::SupabaseVerifier;

/// Resolves bearer tokens to callers
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Verify a bearer token
    ///
    /// # Errors
    ///
    /// Returns an error only when the identity service is unreachable or
    /// misbehaving at the transport level; rejected tokens are `Ok(None)`.
    async fn verify(&self, token: &str) -> AppResult<Option<AuthenticatedUser>>;
}
