// ABOUTME: Main library entry point for the Pierre coach relay
// ABOUTME: Session ingestion into a vector store and grounded coaching replies over HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Coach Relay
//!
//! A small HTTP relay between the Pierre mobile app and two external
//! services: an identity service that resolves bearer tokens, and `OpenAI`,
//! which stores rendered practice sessions in a vector store and answers
//! coaching questions grounded in them.
//!
//! ## Endpoints
//!
//! - `GET /health`: liveness, no authentication
//! - `POST /ingest`: validate a session, upload it as a markdown document
//! - `POST /query`: answer a coaching question from the caller's sessions
//!
//! ## Architecture
//!
//! - **`pierre_relay_core`**: errors, models, validation, constants
//! - **`identity`**, **`vector_store`**, **`llm`**: trait seams for the external services
//! - **`services`**: ingestion and query logic
//! - **`middleware`** and **`server`**: the request pipeline
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_coach_relay::config::ServerConfig;
//! use pierre_coach_relay::server::{serve, ServerResources};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config)?);
//!     serve(resources).await
//! }
//! ```

/// Environment configuration
pub mod config;

/// External API clients
pub mod external;

/// Bearer token verification
pub mod identity;

/// Coaching answer providers and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Per-address rate limiter
pub mod rate_limiting;

/// HTTP route handlers
pub mod routes;

/// Security response headers
pub mod security;

/// Router assembly and serving
pub mod server;

/// Ingestion and query services
pub mod services;

/// Shared utilities
pub mod utils;

/// External document index
pub mod vector_store;

pub use pierre_relay_core::{constants, errors, models};
