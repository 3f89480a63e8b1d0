// ABOUTME: Authenticated HTTP client for the OpenAI REST API
// ABOUTME: Builds endpoint URLs, sends JSON/multipart requests, and maps error bodies to AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `OpenAI` Client
//!
//! Thin transport shared by the vector store and the coach provider. Every
//! non-success status becomes an `ExternalServiceError` whose message carries
//! the upstream detail for server-side logs; callers wrap it in their own
//! generic client-facing error.

use crate::config::OpenAiConfig;
use crate::logging::AppLogger;
use pierre_relay_core::constants::service_names;
use pierre_relay_core::errors::{AppError, AppResult};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

/// `OpenAI` error envelope
#[derive(Debug, Deserialize)]
pub struct OpenAiErrorResponse {
    /// Error payload
    pub error: OpenAiErrorDetail,
}

/// `OpenAI` error payload
#[derive(Debug, Deserialize)]
pub struct OpenAiErrorDetail {
    /// Human-readable message
    pub message: String,
    /// Error type such as `invalid_request_error`
    #[serde(rename = "type")]
    pub error_type: Option<String>,
}

/// Authenticated `OpenAI` API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client from configuration, reusing an existing connection pool
    #[must_use]
    pub fn new(client: Client, config: &OpenAiConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Absolute URL for an endpoint path such as `files` or `vector_stores/{id}/files`
    #[must_use]
    pub fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Authenticated GET request builder
    #[must_use]
    pub fn get(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .get(self.api_url(endpoint))
            .bearer_auth(&self.api_key)
    }

    /// Authenticated POST request builder
    #[must_use]
    pub fn post(&self, endpoint: &str) -> RequestBuilder {
        self.client
            .post(self.api_url(endpoint))
            .bearer_auth(&self.api_key)
    }

    /// Send a request and decode a JSON success body
    ///
    /// # Errors
    ///
    /// Returns `ExternalServiceUnavailable` when the request cannot be sent,
    /// `ExternalServiceError` for non-success statuses or undecodable bodies
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            AppLogger::log_external_call(service_names::OPENAI, operation, false, elapsed_ms(start));
            AppError::external_unavailable(service_names::OPENAI, format!("{operation}: {e}"))
                .with_source(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            AppLogger::log_external_call(service_names::OPENAI, operation, false, elapsed_ms(start));
            return Err(Self::parse_error_response(status, &body, operation));
        }

        AppLogger::log_external_call(service_names::OPENAI, operation, true, elapsed_ms(start));
        response.json::<T>().await.map_err(|e| {
            AppError::external_service(
                service_names::OPENAI,
                format!("{operation}: unexpected response body: {e}"),
            )
            .with_source(e)
        })
    }

    /// Convert a failed response into an error carrying the upstream detail
    #[must_use]
    pub fn parse_error_response(status: StatusCode, body: &str, operation: &str) -> AppError {
        let detail = serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(
            |_| {
                debug!("Unstructured {} error body: {body}", service_names::OPENAI);
                body.chars().take(200).collect::<String>()
            },
            |parsed| {
                let error_type = parsed.error.error_type.unwrap_or_else(|| "unknown".to_owned());
                format!("{} ({error_type})", parsed.error.message)
            },
        );

        warn!(
            status = status.as_u16(),
            operation = %operation,
            "{} request failed: {detail}",
            service_names::OPENAI
        );

        AppError::external_service(
            service_names::OPENAI,
            format!("{operation} failed with status {status}: {detail}"),
        )
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
