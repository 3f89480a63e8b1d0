// ABOUTME: HTTP client construction for calls to the identity and OpenAI services
// ABOUTME: Bounds connection setup only; request duration is left to the upstream services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use pierre_relay_core::constants::service_names;
use pierre_relay_core::errors::{AppError, AppResult};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Connection establishment timeout for upstream calls
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Idle pooled connections are closed after this long
pub const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Build the client shared by every upstream integration
///
/// No overall request timeout is set: index uploads and generation run until
/// the upstream answers or gives up.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised
pub fn upstream_client() -> AppResult<Client> {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS))
        .user_agent(concat!(
            "pierre-coach-relay/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create HTTP client for {}",
                service_names::PIERRE_COACH_RELAY
            ))
            .with_source(e)
        })
}
