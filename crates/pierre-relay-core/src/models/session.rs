// ABOUTME: Practice session metrics model, validation, and markdown document rendering
// ABOUTME: Known fields are type/range checked, unknown fields pass through to the document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Metrics
//!
//! The mobile client posts one payload per practice session. Validation is
//! permissive about shape (unknown fields are kept and rendered under
//! "Additional metrics") and strict about the fields it knows:
//!
//! | field | rule |
//! |---|---|
//! | `session_id` | string, 1..=128 chars |
//! | `timestamp` | RFC 3339 string or epoch milliseconds |
//! | `duration` | number of seconds, `>= 0` |
//! | `shot_count` | non-negative integer |
//! | `accuracy` | number in `[0, 100]` |
//! | `form_score` | number in `[0, 100]` |
//! | `notes` | string, at most 1000 chars |
//!
//! A `user_id` sent by the client is dropped. The owner of a record is always
//! the authenticated caller. `null` is treated the same as an absent field.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{AuthenticatedUser, FieldError};
use crate::constants::limits::{
    MAX_ARTIFACT_COMPONENT_CHARS, MAX_NOTES_CHARS, MAX_SCORE, MAX_SESSION_ID_CHARS, MIN_SCORE,
};

/// Fields with dedicated validation rules
const KNOWN_FIELDS: [&str; 8] = [
    "session_id",
    "user_id",
    "timestamp",
    "duration",
    "shot_count",
    "accuracy",
    "form_score",
    "notes",
];

/// Validated session payload, not yet bound to an owner
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionMetrics {
    /// Client-chosen session identifier
    pub session_id: Option<String>,
    /// Capture time
    pub timestamp: Option<DateTime<Utc>>,
    /// Session length in seconds
    pub duration: Option<f64>,
    /// Number of shots taken
    pub shot_count: Option<u64>,
    /// Shooting accuracy percentage
    pub accuracy: Option<f64>,
    /// Form score out of 100
    pub form_score: Option<f64>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Unknown fields, kept verbatim
    pub extra: Map<String, Value>,
}

impl SessionMetrics {
    /// Validate a raw JSON body
    ///
    /// Every rule is checked so the client receives the full report at once.
    ///
    /// # Errors
    ///
    /// Returns all failed rules when the body is not an object or any known
    /// field has the wrong type or is out of range.
    pub fn from_json(body: &Value) -> Result<Self, Vec<FieldError>> {
        let Some(object) = body.as_object() else {
            return Err(vec![FieldError::new("body", "must be a JSON object")]);
        };

        let mut errors = Vec::new();
        let metrics = Self {
            session_id: session_id(object, &mut errors),
            timestamp: timestamp(object, &mut errors),
            duration: non_negative_number(object, "duration", &mut errors),
            shot_count: non_negative_integer(object, "shot_count", &mut errors),
            accuracy: score(object, "accuracy", &mut errors),
            form_score: score(object, "form_score", &mut errors),
            notes: notes(object, &mut errors),
            extra: object
                .iter()
                .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        };

        if errors.is_empty() {
            Ok(metrics)
        } else {
            Err(errors)
        }
    }
}

fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|value| !value.is_null())
}

fn session_id(object: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match present(object, "session_id")? {
        Value::String(id) if id.trim().is_empty() => {
            errors.push(FieldError::new("session_id", "must not be empty"));
            None
        }
        Value::String(id) if id.chars().count() > MAX_SESSION_ID_CHARS => {
            errors.push(FieldError::new(
                "session_id",
                format!("must be at most {MAX_SESSION_ID_CHARS} characters"),
            ));
            None
        }
        Value::String(id) => Some(id.clone()),
        _ => {
            errors.push(FieldError::new("session_id", "must be a string"));
            None
        }
    }
}

fn timestamp(object: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<DateTime<Utc>> {
    let parsed = match present(object, "timestamp")? {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };

    if parsed.is_none() {
        errors.push(FieldError::new(
            "timestamp",
            "must be an RFC 3339 timestamp or epoch milliseconds",
        ));
    }
    parsed
}

fn non_negative_number(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<f64> {
    match present(object, field)?.as_f64() {
        Some(value) if value >= 0.0 => Some(value),
        Some(_) => {
            errors.push(FieldError::new(field, "must not be negative"));
            None
        }
        None => {
            errors.push(FieldError::new(field, "must be a number"));
            None
        }
    }
}

fn non_negative_integer(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<u64> {
    let value = present(object, field)?;
    if let Some(count) = value.as_u64() {
        return Some(count);
    }
    errors.push(FieldError::new(field, "must be a non-negative integer"));
    None
}

fn score(object: &Map<String, Value>, field: &str, errors: &mut Vec<FieldError>) -> Option<f64> {
    match present(object, field)?.as_f64() {
        Some(value) if (MIN_SCORE..=MAX_SCORE).contains(&value) => Some(value),
        Some(_) => {
            errors.push(FieldError::new(
                field,
                format!("must be between {MIN_SCORE} and {MAX_SCORE}"),
            ));
            None
        }
        None => {
            errors.push(FieldError::new(field, "must be a number"));
            None
        }
    }
}

fn notes(object: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match present(object, "notes")? {
        Value::String(text) if text.chars().count() > MAX_NOTES_CHARS => {
            errors.push(FieldError::new(
                "notes",
                format!("must be at most {MAX_NOTES_CHARS} characters"),
            ));
            None
        }
        Value::String(text) => Some(text.clone()),
        _ => {
            errors.push(FieldError::new("notes", "must be a string"));
            None
        }
    }
}

/// Session metrics bound to the authenticated owner
///
/// Built once per ingestion and rendered once; there is no update path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    /// Resolved session id (client value or epoch-millisecond timestamp)
    pub session_id: String,
    /// Owner, taken from the authenticated principal
    pub user_id: String,
    /// Capture time (client value or ingestion time)
    pub recorded_at: DateTime<Utc>,
    /// Validated metrics
    pub metrics: SessionMetrics,
}

impl SessionRecord {
    /// Bind validated metrics to their owner, filling defaults from `now`
    #[must_use]
    pub fn new(metrics: SessionMetrics, owner: &AuthenticatedUser, now: DateTime<Utc>) -> Self {
        let session_id = metrics
            .session_id
            .clone()
            .unwrap_or_else(|| now.timestamp_millis().to_string());
        let recorded_at = metrics.timestamp.unwrap_or(now);

        Self {
            session_id,
            user_id: owner.id.clone(),
            recorded_at,
            metrics,
        }
    }

    /// File name for the temporary document
    ///
    /// Combines the sanitized user id and session id with a random suffix so
    /// concurrent ingestions never share a path.
    #[must_use]
    pub fn artifact_file_name(&self) -> String {
        let nonce = Uuid::new_v4().simple().to_string();
        format!(
            "session_{}_{}_{}.md",
            sanitize_artifact_component(&self.user_id),
            sanitize_artifact_component(&self.session_id),
            &nonce[..8]
        )
    }

    /// Render the human-readable document submitted to the index
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let metrics = &self.metrics;
        let mut doc = String::new();

        let _ = writeln!(doc, "# Practice Session {}", self.session_id);
        let _ = writeln!(doc);
        let _ = writeln!(doc, "- **User ID:** {}", self.user_id);
        let _ = writeln!(
            doc,
            "- **Recorded at:** {}",
            self.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        );
        if let Some(duration) = metrics.duration {
            let _ = writeln!(doc, "- **Duration:** {duration} seconds");
        }
        if let Some(shots) = metrics.shot_count {
            let _ = writeln!(doc, "- **Shots taken:** {shots}");
        }
        if let Some(accuracy) = metrics.accuracy {
            let _ = writeln!(doc, "- **Accuracy:** {accuracy}%");
        }
        if let Some(form_score) = metrics.form_score {
            let _ = writeln!(doc, "- **Form score:** {form_score}/100");
        }

        if let Some(notes) = metrics.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            let _ = writeln!(doc);
            let _ = writeln!(doc, "## Notes");
            let _ = writeln!(doc);
            let _ = writeln!(doc, "{}", notes.trim());
        }

        if !metrics.extra.is_empty() {
            let _ = writeln!(doc);
            let _ = writeln!(doc, "## Additional metrics");
            let _ = writeln!(doc);
            for (key, value) in &metrics.extra {
                match value {
                    Value::String(text) => {
                        let _ = writeln!(doc, "- **{key}:** {text}");
                    }
                    other => {
                        let _ = writeln!(doc, "- **{key}:** {other}");
                    }
                }
            }
        }

        doc
    }
}

/// Make a client-influenced string safe to embed in a file name
///
/// Keeps ASCII alphanumerics, `-` and `_`; everything else becomes `_`.
#[must_use]
pub fn sanitize_artifact_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_ARTIFACT_COMPONENT_CHARS)
        .collect();

    if cleaned.is_empty() {
        "unknown".to_owned()
    } else {
        cleaned
    }
}
