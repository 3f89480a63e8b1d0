// ABOUTME: HTTP server assembly: router, request pipeline layers, and graceful serving
// ABOUTME: Orders security headers, CORS, body limit, rate limiting, and auth ahead of the routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Server
//!
//! Pipeline, outermost first:
//!
//! 1. panic catcher (uniform 500 body)
//! 2. HTTP trace span
//! 3. request id
//! 4. security headers
//! 5. CORS
//! 6. body size limit
//! 7. rate limiting (every route)
//! 8. bearer authentication (protected routes only)
//! 9. route handlers, with a JSON 404 fallback

mod resources;

pub use resources::ServerResources;

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state, map_response},
    response::{IntoResponse, Response},
    Router,
};
use pierre_relay_core::constants::messages;
use pierre_relay_core::errors::AppError;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, info_span};

use crate::middleware::{
    auth_middleware, body_limit_layer, disable_extractor_limit, payload_too_large_as_json,
    rate_limit_middleware, request_id_middleware, security_headers_middleware, setup_cors,
};
use crate::routes::{HealthRoutes, IngestRoutes, QueryRoutes};

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let protected = Router::new()
        .merge(IngestRoutes::routes())
        .merge(QueryRoutes::routes())
        .route_layer(from_fn_with_state(resources.clone(), auth_middleware));

    Router::new()
        .merge(HealthRoutes::routes())
        .merge(protected)
        .fallback(not_found)
        .with_state(resources.clone())
        .layer(from_fn_with_state(resources.clone(), rate_limit_middleware))
        .layer(disable_extractor_limit())
        .layer(body_limit_layer(resources.config.body_limit_bytes))
        .layer(map_response(payload_too_large_as_json))
        .layer(setup_cors(&resources.config.cors))
        .layer(from_fn_with_state(
            resources.clone(),
            security_headers_middleware,
        ))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = tracing::field::Empty,
                user_id = tracing::field::Empty,
            )
        }))
        .layer(CatchPanicLayer::custom(handle_panic))
}

async fn not_found() -> AppError {
    AppError::not_found("Route")
}

/// Terminal handler for anything a route failed to handle
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    error!("Request handler panicked: {detail}");

    AppError::internal(messages::INTERNAL_ERROR).into_response()
}

/// Bind and serve until Ctrl-C or SIGTERM
///
/// # Errors
///
/// Returns an error if the listen address is invalid, binding fails, or the
/// server stops with an I/O error
pub async fn serve(resources: Arc<ServerResources>) -> Result<()> {
    let addr = format!("{}:{}", resources.config.host, resources.config.http_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Pierre Coach Relay listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        build_router(resources).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server error")?;

    info!("Pierre Coach Relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
