// ABOUTME: Shared test utilities for relay integration tests
// ABOUTME: Scripted identity, index, and coach doubles plus an in-process request helper
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]
//! Shared test utilities for `pierre_coach_relay`
//!
//! Every external collaborator is replaced by an in-memory double that
//! records what it was asked, so tests can assert both the HTTP response
//! and whether the upstream was touched at all.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::ConnectInfo,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use pierre_coach_relay::{
    config::{
        CorsConfig, Environment, IdentityConfig, OpenAiConfig, RateLimitConfig, ServerConfig,
    },
    constants::service_names,
    errors::{AppError, AppResult},
    identity::IdentityVerifier,
    llm::{CoachProvider, CoachRequest},
    models::AuthenticatedUser,
    server::{build_router, ServerResources},
    vector_store::{DocumentIndex, DocumentUpload},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

/// Token the identity double resolves to [`PLAYER_ID`]
pub const VALID_TOKEN: &str = "valid-token";
/// Token the identity double resolves to [`OTHER_PLAYER_ID`]
pub const OTHER_TOKEN: &str = "other-token";
/// Token that makes the identity double fail at the transport level
pub const UNREACHABLE_TOKEN: &str = "identity-down";

/// User behind [`VALID_TOKEN`]
pub const PLAYER_ID: &str = "user-1";
/// User behind [`OTHER_TOKEN`]
pub const OTHER_PLAYER_ID: &str = "user-2";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

// ============================================================================
// Test doubles
// ============================================================================

/// Identity service double keyed on fixed tokens
#[derive(Default)]
pub struct MockVerifier {
    calls: AtomicUsize,
}

impl MockVerifier {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for MockVerifier {
    fn name(&self) -> &'static str {
        "mock-identity"
    }

    async fn verify(&self, token: &str) -> AppResult<Option<AuthenticatedUser>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match token {
            VALID_TOKEN => Ok(Some(AuthenticatedUser::new(
                PLAYER_ID,
                Some("player@example.com".to_owned()),
            ))),
            OTHER_TOKEN => Ok(Some(AuthenticatedUser::new(OTHER_PLAYER_ID, None))),
            UNREACHABLE_TOKEN => Err(AppError::external_unavailable(
                service_names::IDENTITY,
                "connection refused",
            )),
            _ => Ok(None),
        }
    }
}

/// One document the index double received
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub file_name: String,
    pub user_id: String,
    pub contents: String,
}

/// Document index double recording every upload
#[derive(Default)]
pub struct MockIndex {
    uploads: Mutex<Vec<RecordedUpload>>,
    fail: bool,
}

impl MockIndex {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentIndex for MockIndex {
    fn name(&self) -> &'static str {
        "mock-index"
    }

    async fn upload(&self, document: DocumentUpload<'_>) -> AppResult<Value> {
        let contents = tokio::fs::read_to_string(document.path).await.unwrap();
        self.uploads.lock().unwrap().push(RecordedUpload {
            file_name: document.file_name.to_owned(),
            user_id: document.user_id.to_owned(),
            contents,
        });

        if self.fail {
            return Err(AppError::external_service(
                service_names::OPENAI,
                "vector store rejected file file-123 with status failed: server_error",
            ));
        }

        Ok(json!({
            "id": "file-123",
            "object": "vector_store.file",
            "status": "completed",
            "vector_store_id": "vs_test",
            "attributes": { "user_id": document.user_id }
        }))
    }
}

/// What the coach double answers with
#[derive(Debug, Clone)]
pub enum CoachScript {
    Reply(String),
    Empty,
    Fail,
}

/// Coach provider double recording every question
pub struct MockCoach {
    script: CoachScript,
    questions: Mutex<Vec<(String, String)>>,
}

impl MockCoach {
    pub fn new(script: CoachScript) -> Self {
        Self {
            script,
            questions: Mutex::new(Vec::new()),
        }
    }

    /// Recorded `(user_id, message)` pairs
    pub fn questions(&self) -> Vec<(String, String)> {
        self.questions.lock().unwrap().clone()
    }
}

#[async_trait]
impl CoachProvider for MockCoach {
    fn name(&self) -> &'static str {
        "mock-coach"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn answer(&self, request: &CoachRequest<'_>) -> AppResult<Option<String>> {
        self.questions
            .lock()
            .unwrap()
            .push((request.user_id.to_owned(), request.message.to_owned()));

        match &self.script {
            CoachScript::Reply(text) => Ok(Some(text.clone())),
            CoachScript::Empty => Ok(None),
            CoachScript::Fail => Err(AppError::external_service(
                service_names::OPENAI,
                "generate reply failed (500): upstream exploded",
            )),
        }
    }
}

// ============================================================================
// Configuration and application assembly
// ============================================================================

/// Configuration pointing at unreachable upstreams; doubles replace them
pub fn test_config(tmp_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_owned(),
        http_port: 0,
        environment: Environment::Testing,
        body_limit_bytes: 16 * 1024,
        ingest_tmp_dir: tmp_dir.to_path_buf(),
        identity: IdentityConfig {
            supabase_url: "http://127.0.0.1:9".to_owned(),
            service_role_key: "service-role-test".to_owned(),
            cache_ttl_secs: 0,
        },
        openai: OpenAiConfig {
            api_key: "sk-test".to_owned(),
            base_url: "http://127.0.0.1:9/v1".to_owned(),
            model: "gpt-4o-mini".to_owned(),
            vector_store_id: "vs_test".to_owned(),
            poll_interval_ms: 10,
        },
        rate_limit: RateLimitConfig {
            max_requests: 1000,
            ..RateLimitConfig::default()
        },
        cors: CorsConfig::default(),
    }
}

/// Builder for a fully wired relay backed by test doubles
pub struct TestAppBuilder {
    max_requests: u32,
    trust_proxy: bool,
    body_limit_bytes: Option<usize>,
    environment: Environment,
    index: MockIndex,
    coach: CoachScript,
}

impl TestAppBuilder {
    pub fn max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    pub fn trust_proxy(mut self) -> Self {
        self.trust_proxy = true;
        self
    }

    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit_bytes = Some(bytes);
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn failing_index(mut self) -> Self {
        self.index = MockIndex::failing();
        self
    }

    pub fn coach(mut self, script: CoachScript) -> Self {
        self.coach = script;
        self
    }

    pub fn build(self) -> TestApp {
        init_test_logging();

        let tmp = tempfile::tempdir().unwrap();
        let mut config = test_config(tmp.path());
        config.rate_limit.max_requests = self.max_requests;
        config.rate_limit.trust_proxy = self.trust_proxy;
        config.environment = self.environment;
        if let Some(limit) = self.body_limit_bytes {
            config.body_limit_bytes = limit;
        }

        let verifier = Arc::new(MockVerifier::default());
        let index = Arc::new(self.index);
        let coach = Arc::new(MockCoach::new(self.coach));

        let resources = ServerResources::new(config, verifier.clone(), index.clone(), coach.clone());
        let router = build_router(Arc::new(resources));

        TestApp {
            router,
            verifier,
            index,
            coach,
            tmp,
        }
    }
}

/// A relay router plus handles on its doubles
pub struct TestApp {
    pub router: Router,
    pub verifier: Arc<MockVerifier>,
    pub index: Arc<MockIndex>,
    pub coach: Arc<MockCoach>,
    pub tmp: TempDir,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            max_requests: 1000,
            trust_proxy: false,
            body_limit_bytes: None,
            environment: Environment::Testing,
            index: MockIndex::default(),
            coach: CoachScript::Reply("Keep your elbow under the ball.".to_owned()),
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub async fn send(&self, request: TestRequest) -> TestResponse {
        request.send(self.router.clone()).await
    }

    /// Number of files left behind in the ingestion directory
    pub fn leftover_artifacts(&self) -> usize {
        std::fs::read_dir(self.tmp.path()).unwrap().count()
    }
}

// ============================================================================
// Requests and responses
// ============================================================================

/// Helper to build and execute HTTP requests against a router
pub struct TestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    peer: Option<SocketAddr>,
}

impl TestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: Vec::new(),
            peer: None,
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn options(uri: &str) -> Self {
        Self::new(Method::OPTIONS, uri)
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_owned(), value.to_owned()));
        self
    }

    pub fn bearer(self, token: &str) -> Self {
        self.header(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    pub fn json(mut self, data: &Value) -> Self {
        self.body = serde_json::to_vec(data).unwrap();
        self.header(header::CONTENT_TYPE.as_str(), "application/json")
    }

    pub fn raw_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self.header(header::CONTENT_TYPE.as_str(), "application/json")
    }

    /// Pretend the request arrived over a socket from `addr`
    pub fn from_peer(mut self, addr: &str) -> Self {
        self.peer = Some(addr.parse().unwrap());
        self
    }

    pub async fn send(self, app: Router) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (key, value) in self.headers {
            builder = builder.header(key, value);
        }
        if let Some(peer) = self.peer {
            builder = builder.extension(ConnectInfo(peer));
        }

        let request = builder.body(Body::from(self.body)).unwrap();
        let response = app.oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Eagerly read response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "response body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Session payload used by the end-to-end ingestion scenarios
pub fn sample_session() -> Value {
    json!({
        "accuracy": 72,
        "form_score": 81,
        "notes": "Good follow-through"
    })
}
