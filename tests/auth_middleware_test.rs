// ABOUTME: Integration tests for bearer token authentication on the protected routes
// ABOUTME: Covers missing, malformed, rejected, and unverifiable tokens ahead of validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

mod common;

use common::{sample_session, TestApp, TestRequest, UNREACHABLE_TOKEN, VALID_TOKEN};
use serde_json::json;

const PROTECTED: [&str; 2] = ["/ingest", "/query"];

#[tokio::test]
async fn test_missing_authorization_is_401_on_every_protected_route() {
    let app = TestApp::new();

    for path in PROTECTED {
        let response = app
            .send(TestRequest::post(path).json(&json!({"message": "hi"})))
            .await;

        assert_eq!(response.status(), 401, "{path}");
        let body = response.json();
        assert_eq!(body["code"], "AUTH_REQUIRED");
        assert!(body["error"].is_string());
    }

    assert_eq!(app.verifier.calls(), 0);
    assert!(app.index.uploads().is_empty());
    assert!(app.coach.questions().is_empty());
}

#[tokio::test]
async fn test_malformed_authorization_headers_are_rejected_without_lookup() {
    let app = TestApp::new();

    for value in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "valid-token", "Token valid-token"] {
        let response = app
            .send(
                TestRequest::post("/ingest")
                    .header("authorization", value)
                    .json(&sample_session()),
            )
            .await;
        assert_eq!(response.status(), 401, "{value:?}");
    }

    assert_eq!(app.verifier.calls(), 0);
    assert!(app.index.uploads().is_empty());
}

#[tokio::test]
async fn test_scheme_is_case_insensitive() {
    let app = TestApp::new();

    let response = app
        .send(
            TestRequest::post("/query")
                .header("authorization", &format!("bearer {VALID_TOKEN}"))
                .json(&json!({"message": "How was my last session?"})),
        )
        .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_rejected_token_is_401_with_generic_message() {
    let app = TestApp::new();

    let response = app
        .send(TestRequest::post("/ingest").bearer("expired-token").json(&sample_session()))
        .await;

    assert_eq!(response.status(), 401);
    let body = response.json();
    assert_eq!(body["error"], "Invalid or expired token");
    assert_eq!(body["code"], "AUTH_INVALID");
    assert_eq!(app.verifier.calls(), 1);
    assert!(app.index.uploads().is_empty());
}

#[tokio::test]
async fn test_authentication_runs_before_validation() {
    let app = TestApp::new();

    // Invalid session and empty question, but no token: still 401
    let ingest = app
        .send(TestRequest::post("/ingest").json(&json!({"accuracy": 150})))
        .await;
    assert_eq!(ingest.status(), 401);

    let query = app
        .send(TestRequest::post("/query").json(&json!({"message": ""})))
        .await;
    assert_eq!(query.status(), 401);

    let garbage = app
        .send(TestRequest::post("/query").bearer("nope").raw_body("{not json"))
        .await;
    assert_eq!(garbage.status(), 401);
}

#[tokio::test]
async fn test_identity_service_failure_is_generic_500() {
    let app = TestApp::new();

    let response = app
        .send(TestRequest::post("/query").bearer(UNREACHABLE_TOKEN).json(&json!({"message": "hi"})))
        .await;

    assert_eq!(response.status(), 500);
    let body = response.json();
    assert_eq!(body["error"], "Authentication service error");
    assert!(!response.text().contains("connection refused"));
    assert!(app.coach.questions().is_empty());
}
