// ABOUTME: HTTP integration tests for POST /ingest
// ABOUTME: Validation, owner-scoped uploads, generic failures, and temporary document cleanup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(missing_docs)]

mod common;

use common::{
    sample_session, TestApp, TestRequest, OTHER_PLAYER_ID, OTHER_TOKEN, PLAYER_ID, VALID_TOKEN,
};
use serde_json::json;

#[tokio::test]
async fn test_ingest_success_uploads_session_for_caller() {
    let app = TestApp::new();

    let response = app
        .send(TestRequest::post("/ingest").bearer(VALID_TOKEN).json(&sample_session()))
        .await;

    assert_eq!(response.status(), 200);
    let body = response.json();
    assert_eq!(body["ok"], true);
    assert_eq!(body["uploadResponse"]["status"], "completed");
    assert_eq!(body["uploadResponse"]["attributes"]["user_id"], PLAYER_ID);

    let message = body["message"].as_str().unwrap();
    assert!(message.starts_with("Session "));
    assert!(message.ends_with(" uploaded successfully"));

    let uploads = app.index.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].user_id, PLAYER_ID);
    assert!(uploads[0].file_name.ends_with(".md"));
    assert!(uploads[0].contents.contains("72"));
    assert!(uploads[0].contents.contains("81"));
    assert!(uploads[0].contents.contains("Good follow-through"));

    assert_eq!(app.leftover_artifacts(), 0);
}

#[tokio::test]
async fn test_client_session_id_is_echoed() {
    let app = TestApp::new();

    let response = app
        .send(
            TestRequest::post("/ingest")
                .bearer(VALID_TOKEN)
                .json(&json!({"session_id": "morning-free-throws", "accuracy": 64})),
        )
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.json()["message"],
        "Session morning-free-throws uploaded successfully"
    );
}

#[tokio::test]
async fn test_client_supplied_user_id_is_ignored() {
    let app = TestApp::new();

    let response = app
        .send(
            TestRequest::post("/ingest")
                .bearer(OTHER_TOKEN)
                .json(&json!({"user_id": PLAYER_ID, "accuracy": 55})),
        )
        .await;

    assert_eq!(response.status(), 200);
    let uploads = app.index.uploads();
    assert_eq!(uploads[0].user_id, OTHER_PLAYER_ID);
    assert!(uploads[0].contents.contains(OTHER_PLAYER_ID));
    assert!(!uploads[0].contents.contains(PLAYER_ID));
}

#[tokio::test]
async fn test_out_of_range_score_is_400_without_upload() {
    let app = TestApp::new();

    let response = app
        .send(
            TestRequest::post("/ingest")
                .bearer(VALID_TOKEN)
                .json(&json!({"accuracy": 150, "form_score": 81})),
        )
        .await;

    assert_eq!(response.status(), 400);
    let body = response.json();
    assert_eq!(body["error"], "Invalid session payload");
    assert_eq!(body["details"][0]["field"], "accuracy");

    assert!(app.index.uploads().is_empty());
    assert_eq!(app.leftover_artifacts(), 0);
}

#[tokio::test]
async fn test_wrong_field_types_are_400() {
    let app = TestApp::new();

    for payload in [
        json!({"notes": 42}),
        json!({"shot_count": -3}),
        json!({"timestamp": "last tuesday"}),
        json!(["accuracy", 72]),
    ] {
        let response = app
            .send(TestRequest::post("/ingest").bearer(VALID_TOKEN).json(&payload))
            .await;
        assert_eq!(response.status(), 400, "{payload}");
    }

    assert!(app.index.uploads().is_empty());
}

#[tokio::test]
async fn test_malformed_or_empty_body_is_400() {
    let app = TestApp::new();

    let malformed = app
        .send(TestRequest::post("/ingest").bearer(VALID_TOKEN).raw_body("{\"accuracy\": "))
        .await;
    assert_eq!(malformed.status(), 400);
    let body = malformed.json();
    assert_eq!(body["error"], "Request body must be valid JSON");
    assert_eq!(body["code"], "INVALID_FORMAT");

    let empty = app
        .send(TestRequest::post("/ingest").bearer(VALID_TOKEN))
        .await;
    assert_eq!(empty.status(), 400);

    assert!(app.index.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_failure_is_generic_500_and_cleans_up() {
    let app = TestApp::builder().failing_index().build();

    let response = app
        .send(TestRequest::post("/ingest").bearer(VALID_TOKEN).json(&sample_session()))
        .await;

    assert_eq!(response.status(), 500);
    let body = response.json();
    assert_eq!(body["error"], "Failed to upload session data");
    assert!(!response.text().contains("server_error"));

    assert_eq!(app.index.uploads().len(), 1);
    assert_eq!(app.leftover_artifacts(), 0);
}

#[tokio::test]
async fn test_concurrent_ingests_use_distinct_documents() {
    let app = TestApp::new();
    let payload = json!({"session_id": "same-id", "accuracy": 70});

    let (first, second) = tokio::join!(
        app.send(TestRequest::post("/ingest").bearer(VALID_TOKEN).json(&payload)),
        app.send(TestRequest::post("/ingest").bearer(VALID_TOKEN).json(&payload)),
    );

    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 200);

    let uploads = app.index.uploads();
    assert_eq!(uploads.len(), 2);
    assert_ne!(uploads[0].file_name, uploads[1].file_name);
    assert_eq!(app.leftover_artifacts(), 0);
}
