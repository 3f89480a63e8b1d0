// ABOUTME: Shared utilities for the relay
// ABOUTME: Currently HTTP client construction for upstream services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Upstream HTTP client construction
pub mod http_client;
