// ABOUTME: Core types and constants for the Pierre coach relay
// ABOUTME: Foundation crate with error handling, session/query models, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Relay Core
//!
//! Foundation crate for the Pierre coach relay. It holds everything that does
//! not need a network stack: the unified error type, the session and query
//! models together with their validation rules, and shared constants.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Limits, fixed messages, and environment variable names
//! - **models**: Session metrics, coach queries, and the authenticated principal

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Session metrics, coach queries, and the authenticated principal
pub mod models;
