// ABOUTME: Health check route handler for liveness monitoring
// ABOUTME: The only endpoint reachable without a bearer token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use axum::{routing::get, Json, Router};
use pierre_relay_core::constants::endpoints;
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check route for any router state
    pub fn routes<S>() -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        Router::new().route(endpoints::HEALTH, get(Self::health))
    }

    async fn health() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }
}
