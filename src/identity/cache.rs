// ABOUTME: Time-bounded cache of successful token verifications
// ABOUTME: Wraps any IdentityVerifier and keys entries by the SHA-256 digest of the token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use pierre_relay_core::errors::AppResult;
use pierre_relay_core::models::AuthenticatedUser;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::debug;

use super::IdentityVerifier;

/// Cached entries beyond this count trigger a sweep of expired ones
const SWEEP_THRESHOLD: usize = 10_000;

struct CachedUser {
    user: AuthenticatedUser,
    verified_at: Instant,
}

/// Remembers verified tokens for a fixed TTL
///
/// Only successful verifications are cached, so a rejected token is asked
/// about again on its next use. A zero TTL disables caching entirely.
pub struct CachingVerifier {
    inner: Arc<dyn IdentityVerifier>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedUser>>,
}

impl CachingVerifier {
    /// Wrap `inner` with a cache of the given TTL
    #[must_use]
    pub fn new(inner: Arc<dyn IdentityVerifier>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached verifications, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn cache_key(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    async fn lookup(&self, key: &str) -> Option<AuthenticatedUser> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|cached| cached.verified_at.elapsed() < self.ttl)
            .map(|cached| cached.user.clone())
    }

    async fn store(&self, key: String, user: AuthenticatedUser) {
        let mut entries = self.entries.write().await;
        if entries.len() >= SWEEP_THRESHOLD {
            let ttl = self.ttl;
            entries.retain(|_, cached| cached.verified_at.elapsed() < ttl);
        }
        entries.insert(
            key,
            CachedUser {
                user,
                verified_at: Instant::now(),
            },
        );
    }
}

#[async_trait]
impl IdentityVerifier for CachingVerifier {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn verify(&self, token: &str) -> AppResult<Option<AuthenticatedUser>> {
        if self.ttl.is_zero() {
            return self.inner.verify(token).await;
        }

        let key = Self::cache_key(token);
        if let Some(user) = self.lookup(&key).await {
            debug!(user.id = %user.id, "Token verification served from cache");
            return Ok(Some(user));
        }

        let verified = self.inner.verify(token).await?;
        if let Some(user) = &verified {
            self.store(key, user.clone()).await;
        }
        Ok(verified)
    }
}
