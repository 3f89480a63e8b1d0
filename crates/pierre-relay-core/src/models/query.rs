// ABOUTME: Coach query model with length validation
// ABOUTME: Accepts a single message field of 1 to 2000 characters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;
use serde_json::Value;

use super::FieldError;
use crate::constants::limits::MAX_QUERY_CHARS;

/// A validated coaching question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoachQuery {
    /// The question, as sent by the client
    pub message: String,
}

impl CoachQuery {
    /// Validate a raw JSON body
    ///
    /// Fields other than `message` are ignored.
    ///
    /// # Errors
    ///
    /// Returns the list of failed rules when the body is not an object or
    /// `message` is missing, not a string, empty, or longer than the limit.
    /// Whitespace counts toward the length like any other character.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = body.as_object() else {
            return Err(vec![FieldError::new("body", "must be a JSON object")]);
        };

        let message = match object.get("message") {
            None | Some(Value::Null) => {
                return Err(vec![FieldError::new("message", "is required")]);
            }
            Some(Value::String(message)) => message,
            Some(_) => return Err(vec![FieldError::new("message", "must be a string")]),
        };

        if message.is_empty() {
            return Err(vec![FieldError::new("message", "must not be empty")]);
        }

        // Characters, not bytes
        if message.chars().count() > MAX_QUERY_CHARS {
            return Err(vec![FieldError::new(
                "message",
                format!("must be at most {MAX_QUERY_CHARS} characters"),
            )]);
        }

        Ok(Self {
            message: message.clone(),
        })
    }
}
