// ABOUTME: Shared server resources handed to every handler and middleware as axum state
// ABOUTME: Wires configuration, identity verification, services, and the rate limiter together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Duration;

use pierre_relay_core::errors::AppResult;

use crate::config::ServerConfig;
use crate::external::OpenAiClient;
use crate::identity::{CachingVerifier, IdentityVerifier, SupabaseVerifier};
use crate::llm::{CoachProvider, OpenAiCoachProvider};
use crate::rate_limiting::IpRateLimiter;
use crate::security::SecurityConfig;
use crate::services::{CoachService, IngestService};
use crate::utils::http_client::upstream_client;
use crate::vector_store::{DocumentIndex, OpenAiVectorStore};

/// Everything a request needs, created once at startup
pub struct ServerResources {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Bearer token verifier
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Session Ingestor
    pub ingest: IngestService,
    /// Coach Query Responder
    pub coach: CoachService,
    /// Per-address request limiter
    pub rate_limiter: IpRateLimiter,
    /// Response security headers
    pub security: SecurityConfig,
}

impl ServerResources {
    /// Assemble resources from explicit collaborators
    ///
    /// The verifier is wrapped in a cache when the configured TTL is non-zero.
    #[must_use]
    pub fn new(
        config: ServerConfig,
        verifier: Arc<dyn IdentityVerifier>,
        index: Arc<dyn DocumentIndex>,
        provider: Arc<dyn CoachProvider>,
    ) -> Self {
        let verifier: Arc<dyn IdentityVerifier> = if config.identity.cache_ttl_secs > 0 {
            Arc::new(CachingVerifier::new(
                verifier,
                Duration::from_secs(config.identity.cache_ttl_secs),
            ))
        } else {
            verifier
        };

        Self {
            verifier,
            ingest: IngestService::new(index, config.ingest_tmp_dir.clone()),
            coach: CoachService::new(provider),
            rate_limiter: IpRateLimiter::new(config.rate_limit.clone()),
            security: SecurityConfig::for_environment(config.environment),
            config: Arc::new(config),
        }
    }

    /// Build the production collaborators (Supabase and `OpenAI`) from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let client = upstream_client()?;
        let openai = OpenAiClient::new(client.clone(), &config.openai);

        let verifier = Arc::new(SupabaseVerifier::new(client, &config.identity));
        let index = Arc::new(OpenAiVectorStore::new(openai.clone(), &config.openai));
        let provider = Arc::new(OpenAiCoachProvider::new(openai, &config.openai));

        Ok(Self::new(config, verifier, index, provider))
    }
}
