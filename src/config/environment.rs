// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses ports, upstream credentials, rate limits, CORS, and temp storage from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use pierre_relay_core::constants::{defaults, env_vars};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Environment type for security headers and logging defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Seed the process environment from a `.env` file in the working directory
///
/// Variables already set take precedence. Runs before logging is installed,
/// so the outcome is returned for the caller to report.
///
/// # Errors
///
/// Returns an error if no `.env` file exists or it cannot be parsed
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

/// External identity service (bearer token verification)
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Base URL of the Supabase project
    pub supabase_url: String,
    /// Service-role key sent as `apikey`
    pub service_role_key: String,
    /// How long a verified token is trusted without re-verification (0 = never cached)
    pub cache_ttl_secs: u64,
}

/// External generative and indexing service
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key
    pub api_key: String,
    /// API base URL, including the `/v1` prefix
    pub base_url: String,
    /// Model used for coaching replies
    pub model: String,
    /// Vector store holding the session documents
    pub vector_store_id: String,
    /// Delay between ingestion status checks
    pub poll_interval_ms: u64,
}

/// Per-address rate limiting
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_secs: u64,
    /// Use the first `X-Forwarded-For` entry as the client address
    pub trust_proxy: bool,
    /// Tracked-address count that triggers stale entry cleanup
    pub cleanup_threshold: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: defaults::RATE_LIMIT_MAX_REQUESTS,
            window_secs: defaults::RATE_LIMIT_WINDOW_SECS,
            trust_proxy: false,
            cleanup_threshold: defaults::RATE_LIMIT_CLEANUP_THRESHOLD,
        }
    }
}

/// Cross-origin policy
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated origin list, or `*`
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".to_owned(),
        }
    }
}

/// Complete relay configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Request body ceiling in bytes
    pub body_limit_bytes: usize,
    /// Directory for temporary session documents
    pub ingest_tmp_dir: PathBuf,
    /// Identity service settings
    pub identity: IdentityConfig,
    /// Generative/index service settings
    pub openai: OpenAiConfig,
    /// Rate limiting settings
    pub rate_limit: RateLimitConfig,
    /// CORS settings
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Call [`load_dotenv`] beforehand to seed the environment from a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails to parse
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = match env::var(env_vars::PORT).or_else(|_| env::var(env_vars::HTTP_PORT)) {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid {} value: {raw}", env_vars::PORT))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let config = Self {
            host: env_var_or(env_vars::HOST, defaults::HOST),
            http_port,
            environment: Environment::from_str_or_default(&env_var_or(
                env_vars::ENVIRONMENT,
                "development",
            )),
            body_limit_bytes: parse_env_or(env_vars::BODY_LIMIT_BYTES, defaults::BODY_LIMIT_BYTES)?,
            ingest_tmp_dir: env::var(env_vars::INGEST_TMP_DIR)
                .map_or_else(|_| env::temp_dir(), PathBuf::from),

            identity: IdentityConfig {
                supabase_url: required_env(env_vars::SUPABASE_URL)?,
                service_role_key: required_env(env_vars::SUPABASE_SERVICE_ROLE_KEY)?,
                cache_ttl_secs: parse_env_or(
                    env_vars::AUTH_CACHE_TTL_SECS,
                    defaults::AUTH_CACHE_TTL_SECS,
                )?,
            },

            openai: OpenAiConfig {
                api_key: required_env(env_vars::OPENAI_API_KEY)?,
                base_url: env_var_or(env_vars::OPENAI_BASE_URL, defaults::OPENAI_BASE_URL),
                model: env_var_or(env_vars::OPENAI_MODEL, defaults::OPENAI_MODEL),
                vector_store_id: required_env(env_vars::VECTOR_STORE_ID)?,
                poll_interval_ms: parse_env_or(
                    env_vars::VECTOR_STORE_POLL_INTERVAL_MS,
                    defaults::VECTOR_STORE_POLL_INTERVAL_MS,
                )?,
            },

            rate_limit: RateLimitConfig {
                max_requests: parse_env_or(
                    env_vars::RATE_LIMIT_MAX_REQUESTS,
                    defaults::RATE_LIMIT_MAX_REQUESTS,
                )?,
                window_secs: parse_env_or(
                    env_vars::RATE_LIMIT_WINDOW_SECS,
                    defaults::RATE_LIMIT_WINDOW_SECS,
                )?,
                trust_proxy: parse_env_or(env_vars::RATE_LIMIT_TRUST_PROXY, false)?,
                cleanup_threshold: defaults::RATE_LIMIT_CLEANUP_THRESHOLD,
            },

            cors: CorsConfig {
                allowed_origins: env_var_or(env_vars::CORS_ALLOWED_ORIGINS, "*"),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-length rate limit window, a zero quota, or a
    /// zero ingestion poll interval
    pub fn validate(&self) -> Result<()> {
        if self.rate_limit.window_secs == 0 {
            anyhow::bail!("{} must be greater than zero", env_vars::RATE_LIMIT_WINDOW_SECS);
        }
        if self.rate_limit.max_requests == 0 {
            anyhow::bail!("{} must be greater than zero", env_vars::RATE_LIMIT_MAX_REQUESTS);
        }
        if self.openai.poll_interval_ms == 0 {
            anyhow::bail!(
                "{} must be greater than zero",
                env_vars::VECTOR_STORE_POLL_INTERVAL_MS
            );
        }
        Ok(())
    }

    /// Human-readable configuration overview with secrets omitted
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Pierre Coach Relay Configuration:\n\
             - Listen: {}:{}\n\
             - Environment: {}\n\
             - Identity Service: {}\n\
             - Token Cache TTL: {}s\n\
             - OpenAI Base URL: {}\n\
             - OpenAI Model: {}\n\
             - Vector Store: {}\n\
             - Rate Limiting: {} requests / {}s (trust proxy: {})\n\
             - Body Limit: {} bytes\n\
             - CORS Origins: {}\n\
             - Temp Dir: {}",
            self.host,
            self.http_port,
            self.environment,
            self.identity.supabase_url,
            self.identity.cache_ttl_secs,
            self.openai.base_url,
            self.openai.model,
            self.openai.vector_store_id,
            self.rate_limit.max_requests,
            self.rate_limit.window_secs,
            self.rate_limit.trust_proxy,
            self.body_limit_bytes,
            self.cors.allowed_origins,
            self.ingest_tmp_dir.display(),
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn required_env(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Missing required environment variable {key}"))
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: {raw}")),
        Err(_) => Ok(default),
    }
}
