// ABOUTME: Session ingestion route handler
// ABOUTME: Validates the session payload and hands it to the Session Ingestor for the caller
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, routing::post, Extension, Json, Router};
use bytes::Bytes;
use pierre_relay_core::constants::{endpoints, messages};
use pierre_relay_core::errors::{AppError, AppResult};
use pierre_relay_core::models::{AuthenticatedUser, SessionMetrics};
use serde::Serialize;
use serde_json::Value;

use super::parse_json_body;
use crate::server::ServerResources;

/// Successful ingestion body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Always `true`
    pub ok: bool,
    /// `Session <id> uploaded successfully`
    pub message: String,
    /// Index acknowledgment, passed through unchanged
    pub upload_response: Value,
}

/// Ingestion routes implementation
pub struct IngestRoutes;

impl IngestRoutes {
    /// Create the ingestion route
    pub fn routes() -> Router<Arc<ServerResources>> {
        Router::new().route(endpoints::INGEST, post(Self::ingest))
    }

    async fn ingest(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        body: Bytes,
    ) -> AppResult<Json<IngestResponse>> {
        let payload = parse_json_body(&body)?;
        let metrics = SessionMetrics::from_json(&payload)
            .map_err(|errors| AppError::validation(messages::INVALID_SESSION, &errors))?;

        let outcome = resources.ingest.ingest(metrics, &user).await?;

        Ok(Json(IngestResponse {
            ok: true,
            message: format!("Session {} uploaded successfully", outcome.session_id),
            upload_response: outcome.upload_response,
        }))
    }
}
