// ABOUTME: OpenAI vector store client: file upload, store attachment, and status polling
// ABOUTME: Tags each attached file with a user_id attribute for per-user retrieval filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Duration;

use async_trait::async_trait;
use pierre_relay_core::constants::service_names;
use pierre_relay_core::errors::{AppError, AppResult};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use super::{DocumentIndex, DocumentUpload};
use crate::config::OpenAiConfig;
use crate::external::OpenAiClient;

/// Purpose required for files consumed by `file_search`
const FILE_PURPOSE: &str = "assistants";

/// Attachment status while the store is still chunking and embedding
const STATUS_IN_PROGRESS: &str = "in_progress";
/// Attachment status once the file is searchable
const STATUS_COMPLETED: &str = "completed";

/// Uploaded file object (only the id is needed)
#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

/// Vector store file status extracted from the raw acknowledgment
#[derive(Debug, Deserialize)]
struct AttachmentStatus {
    status: String,
    #[serde(default)]
    last_error: Option<AttachmentError>,
}

#[derive(Debug, Deserialize)]
struct AttachmentError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// `OpenAI` vector store used as the session index
pub struct OpenAiVectorStore {
    api: OpenAiClient,
    vector_store_id: String,
    poll_interval: Duration,
}

impl OpenAiVectorStore {
    /// Create an index backed by one vector store
    #[must_use]
    pub fn new(api: OpenAiClient, config: &OpenAiConfig) -> Self {
        Self {
            api,
            vector_store_id: config.vector_store_id.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    async fn upload_file(&self, document: &DocumentUpload<'_>) -> AppResult<String> {
        let contents = tokio::fs::read(document.path).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to read session document {}",
                document.path.display()
            ))
            .with_source(e)
        })?;

        let part = Part::bytes(contents)
            .file_name(document.file_name.to_owned())
            .mime_str("text/markdown")
            .map_err(|e| {
                AppError::internal("Invalid document MIME type").with_source(e)
            })?;
        let form = Form::new().text("purpose", FILE_PURPOSE).part("file", part);

        let file: FileObject = self
            .api
            .send_json(self.api.post("files").multipart(form), "upload file")
            .await?;
        Ok(file.id)
    }

    async fn attach_file(&self, file_id: &str, user_id: &str) -> AppResult<Value> {
        let endpoint = format!("vector_stores/{}/files", self.vector_store_id);
        let body = json!({
            "file_id": file_id,
            "attributes": { "user_id": user_id },
        });

        self.api
            .send_json(self.api.post(&endpoint).json(&body), "attach file")
            .await
    }

    async fn attachment(&self, file_id: &str) -> AppResult<Value> {
        let endpoint = format!("vector_stores/{}/files/{file_id}", self.vector_store_id);
        self.api
            .send_json(self.api.get(&endpoint), "poll file status")
            .await
    }

    fn status_of(acknowledgment: &Value) -> AppResult<AttachmentStatus> {
        AttachmentStatus::deserialize(acknowledgment).map_err(|e| {
            AppError::external_service(
                service_names::OPENAI,
                "vector store file response has no status",
            )
            .with_source(e)
        })
    }
}

#[async_trait]
impl DocumentIndex for OpenAiVectorStore {
    fn name(&self) -> &'static str {
        service_names::OPENAI
    }

    #[instrument(skip(self, document), fields(file_name = %document.file_name))]
    async fn upload(&self, document: DocumentUpload<'_>) -> AppResult<Value> {
        let file_id = self.upload_file(&document).await?;
        debug!(file_id = %file_id, "Uploaded session document");

        let mut acknowledgment = self.attach_file(&file_id, document.user_id).await?;
        let mut status = Self::status_of(&acknowledgment)?;

        while status.status == STATUS_IN_PROGRESS {
            tokio::time::sleep(self.poll_interval).await;
            acknowledgment = self.attachment(&file_id).await?;
            status = Self::status_of(&acknowledgment)?;
        }

        if status.status != STATUS_COMPLETED {
            let (code, message) = status.last_error.map_or_else(
                || (String::from("unknown"), String::new()),
                |e| (e.code.unwrap_or_default(), e.message.unwrap_or_default()),
            );
            return Err(AppError::external_service(
                service_names::OPENAI,
                format!(
                    "vector store rejected file {file_id} with status {}: {code} {message}",
                    status.status
                ),
            ));
        }

        info!(
            file_id = %file_id,
            vector_store_id = %self.vector_store_id,
            "Session document indexed"
        );
        Ok(acknowledgment)
    }
}
