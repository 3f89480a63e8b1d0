// ABOUTME: Domain models for the coach relay
// ABOUTME: Re-exports session metrics, coach query, principal, and validation report types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `SessionMetrics`: validated practice-session payload
//! - `SessionRecord`: metrics bound to their owner, ready to be rendered as a document
//! - `CoachQuery`: a validated coaching question
//! - `AuthenticatedUser`: the principal resolved from a bearer token
//! - `FieldError`: one entry of a validation report

mod principal;
mod query;
mod session;

pub use principal::AuthenticatedUser;
pub use query::CoachQuery;
pub use session::{sanitize_artifact_component, SessionMetrics, SessionRecord};

use serde::{Deserialize, Serialize};

/// One failed validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field (`body` for whole-payload problems)
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
