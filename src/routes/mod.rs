// ABOUTME: Route module organization for the relay's HTTP endpoints
// ABOUTME: Thin handlers that parse bodies, run validation, and delegate to the service layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for Pierre Coach Relay
//!
//! Each module contains route definitions and thin handler functions.
//! Authentication is applied by the server as a route layer on the
//! protected routers, so handlers receive an already-resolved caller.

/// Liveness check
pub mod health;
/// Session ingestion
pub mod ingest;
/// Coaching questions
pub mod query;

pub use health::HealthRoutes;
pub use ingest::IngestRoutes;
pub use query::QueryRoutes;

use bytes::Bytes;
use pierre_relay_core::errors::{AppError, AppResult};
use serde_json::Value;

/// Parse a request body as JSON
///
/// Bodies are taken as raw bytes so a malformed payload becomes a JSON 400
/// from the relay rather than the framework's plain-text rejection.
fn parse_json_body(body: &Bytes) -> AppResult<Value> {
    serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_format("Request body must be valid JSON").with_source(e))
}
