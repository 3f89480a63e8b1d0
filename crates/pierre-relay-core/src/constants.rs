// ABOUTME: Constants for the Pierre coach relay organized by domain
// ABOUTME: Validation limits, fixed client messages, environment variable names, and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Groups the relay's constants by domain rather than keeping them in one
//! flat list.

/// API endpoints
pub mod endpoints {
    /// Liveness check, the only unauthenticated route
    pub const HEALTH: &str = "/health";
    /// Session ingestion
    pub const INGEST: &str = "/ingest";
    /// Coach question answering
    pub const QUERY: &str = "/query";
}

/// Validation limits for request payloads
pub mod limits {
    /// Maximum coach question length in characters
    pub const MAX_QUERY_CHARS: usize = 2000;
    /// Maximum session notes length in characters
    pub const MAX_NOTES_CHARS: usize = 1000;
    /// Maximum client-supplied session id length in characters
    pub const MAX_SESSION_ID_CHARS: usize = 128;
    /// Lower bound for accuracy and form score
    pub const MIN_SCORE: f64 = 0.0;
    /// Upper bound for accuracy and form score
    pub const MAX_SCORE: f64 = 100.0;
    /// Maximum length of one sanitized component of a temporary file name
    pub const MAX_ARTIFACT_COMPONENT_CHARS: usize = 64;
}

/// Fixed client-facing messages
pub mod messages {
    /// Reply used when the generative service returns no usable text
    pub const FALLBACK_REPLY: &str = "Sorry, I couldn't find any relevant insights right now.";
    /// Generic ingestion failure
    pub const INGEST_FAILED: &str = "Failed to upload session data";
    /// Generic query failure
    pub const QUERY_FAILED: &str = "Failed to generate a coaching reply";
    /// Generic authentication failure
    pub const AUTH_FAILED: &str = "Invalid or expired token";
    /// Generic failure while talking to the identity service
    pub const AUTH_SERVICE_FAILED: &str = "Authentication service error";
    /// Generic unhandled failure
    pub const INTERNAL_ERROR: &str = "Internal server error";
    /// Invalid session payload
    pub const INVALID_SESSION: &str = "Invalid session payload";
    /// Invalid query payload
    pub const INVALID_QUERY: &str = "Invalid query payload";
}

/// Service names used in logs and error chains
pub mod service_names {
    /// This relay
    pub const PIERRE_COACH_RELAY: &str = "pierre-coach-relay";
    /// External identity service
    pub const IDENTITY: &str = "Supabase";
    /// External generative and indexing service
    pub const OPENAI: &str = "OpenAI";
}

/// Environment variable names
pub mod env_vars {
    /// Listen port
    pub const PORT: &str = "PORT";
    /// Listen port (alternate name)
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Bind address
    pub const HOST: &str = "HOST";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Identity service base URL
    pub const SUPABASE_URL: &str = "SUPABASE_URL";
    /// Identity service key
    pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
    /// Verified-token cache TTL
    pub const AUTH_CACHE_TTL_SECS: &str = "AUTH_CACHE_TTL_SECS";
    /// Generative/index service API key
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    /// Generative/index service base URL
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    /// Model used for coaching replies
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    /// External index identifier
    pub const VECTOR_STORE_ID: &str = "VECTOR_STORE_ID";
    /// Index ingestion status polling interval
    pub const VECTOR_STORE_POLL_INTERVAL_MS: &str = "VECTOR_STORE_POLL_INTERVAL_MS";
    /// Requests allowed per window
    pub const RATE_LIMIT_MAX_REQUESTS: &str = "RATE_LIMIT_MAX_REQUESTS";
    /// Window length
    pub const RATE_LIMIT_WINDOW_SECS: &str = "RATE_LIMIT_WINDOW_SECS";
    /// Take the client address from `X-Forwarded-For`
    pub const RATE_LIMIT_TRUST_PROXY: &str = "RATE_LIMIT_TRUST_PROXY";
    /// Request body ceiling
    pub const BODY_LIMIT_BYTES: &str = "BODY_LIMIT_BYTES";
    /// Allowed CORS origins
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Directory for temporary session documents
    pub const INGEST_TMP_DIR: &str = "INGEST_TMP_DIR";
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8787;
    /// Default bind address
    pub const HOST: &str = "0.0.0.0";
    /// Default generative service base URL
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default model for coaching replies
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";
    /// Default polling interval while the index processes an upload
    pub const VECTOR_STORE_POLL_INTERVAL_MS: u64 = 1000;
    /// Default requests per window per source address
    pub const RATE_LIMIT_MAX_REQUESTS: u32 = 100;
    /// Default window length (15 minutes)
    pub const RATE_LIMIT_WINDOW_SECS: u64 = 900;
    /// Rate limiter size that triggers stale entry cleanup
    pub const RATE_LIMIT_CLEANUP_THRESHOLD: usize = 10_000;
    /// Default body ceiling (1 MiB)
    pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;
    /// Verified tokens are not cached unless configured
    pub const AUTH_CACHE_TTL_SECS: u64 = 0;
}
