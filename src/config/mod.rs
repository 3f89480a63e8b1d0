// ABOUTME: Configuration management module for centralized relay settings
// ABOUTME: Exposes environment-based server configuration and its typed sub-sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for Pierre Coach Relay
//!
//! All configuration comes from environment variables (optionally seeded from
//! a `.env` file). There is no configuration file.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    load_dotenv, CorsConfig, Environment, IdentityConfig, OpenAiConfig, RateLimitConfig,
    ServerConfig,
};
