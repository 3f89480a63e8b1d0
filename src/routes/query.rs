// ABOUTME: Coach query route handler
// ABOUTME: Validates the question and returns the Coach Query Responder's reply
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, routing::post, Extension, Json, Router};
use bytes::Bytes;
use pierre_relay_core::constants::{endpoints, messages};
use pierre_relay_core::errors::{AppError, AppResult};
use pierre_relay_core::models::{AuthenticatedUser, CoachQuery};
use serde::Serialize;

use super::parse_json_body;
use crate::server::ServerResources;

/// Successful query body
#[derive(Debug, Serialize)]
pub struct QueryResponse {
    /// Generated answer or the fixed fallback
    pub reply: String,
}

/// Query routes implementation
pub struct QueryRoutes;

impl QueryRoutes {
    /// Create the query route
    pub fn routes() -> Router<Arc<ServerResources>> {
        Router::new().route(endpoints::QUERY, post(Self::query))
    }

    async fn query(
        State(resources): State<Arc<ServerResources>>,
        Extension(user): Extension<AuthenticatedUser>,
        body: Bytes,
    ) -> AppResult<Json<QueryResponse>> {
        let payload = parse_json_body(&body)?;
        let query = CoachQuery::from_json(&payload)
            .map_err(|errors| AppError::validation(messages::INVALID_QUERY, &errors))?;

        let reply = resources.coach.reply(&query, &user).await?;
        Ok(Json(QueryResponse { reply }))
    }
}
