// ABOUTME: Authenticated principal resolved from a bearer token
// ABOUTME: Attached to request extensions by the auth middleware and read by handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Caller identity as reported by the identity service
///
/// Handlers take the user id from here and never from a request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Identity-service user id
    pub id: String,
    /// Email, when the identity service exposes one
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Create a principal
    pub fn new(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            id: id.into(),
            email,
        }
    }
}
