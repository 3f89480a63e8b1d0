// ABOUTME: Supabase Auth token verifier calling the project's /auth/v1/user endpoint
// ABOUTME: Authenticates with the service-role key and maps the user record to AuthenticatedUser
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use pierre_relay_core::constants::service_names;
use pierre_relay_core::errors::{AppError, AppResult};
use pierre_relay_core::models::AuthenticatedUser;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::IdentityVerifier;
use crate::config::IdentityConfig;

/// Path of the current-user endpoint relative to the project URL
const USER_ENDPOINT: &str = "auth/v1/user";

/// User record returned by Supabase Auth
#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Option<String>,
    email: Option<String>,
}

/// Verifies tokens by asking Supabase who they belong to
#[derive(Clone)]
pub struct SupabaseVerifier {
    client: Client,
    user_url: String,
    service_role_key: String,
}

impl SupabaseVerifier {
    /// Create a verifier for one Supabase project
    #[must_use]
    pub fn new(client: Client, config: &IdentityConfig) -> Self {
        Self {
            client,
            user_url: format!(
                "{}/{USER_ENDPOINT}",
                config.supabase_url.trim_end_matches('/')
            ),
            service_role_key: config.service_role_key.clone(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseVerifier {
    fn name(&self) -> &'static str {
        service_names::IDENTITY
    }

    async fn verify(&self, token: &str) -> AppResult<Option<AuthenticatedUser>> {
        let response = self
            .client
            .get(&self.user_url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(
                    service_names::IDENTITY,
                    format!("token verification request failed: {e}"),
                )
                .with_source(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            // Expired, revoked, or malformed tokens all land here
            debug!(status = status.as_u16(), "Identity service rejected token");
            return Ok(None);
        }

        let user = match response.json::<SupabaseUser>().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Identity service returned an unreadable user record: {e}");
                return Ok(None);
            }
        };

        Ok(user
            .id
            .filter(|id| !id.is_empty())
            .map(|id| AuthenticatedUser::new(id, user.email)))
    }
}
