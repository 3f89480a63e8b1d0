// ABOUTME: Session Ingestor: renders validated metrics to markdown and hands them to the index
// ABOUTME: Writes a uniquely named temporary document and always removes it after the upload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use pierre_relay_core::constants::messages;
use pierre_relay_core::errors::{AppError, AppResult, ErrorCode};
use pierre_relay_core::models::{AuthenticatedUser, SessionMetrics, SessionRecord};
use serde_json::Value;
use tracing::{info, warn};

use crate::vector_store::{DocumentIndex, DocumentUpload};

/// Result of a successful ingestion
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    /// Session id the document was stored under
    pub session_id: String,
    /// Index acknowledgment, opaque to the relay
    pub upload_response: Value,
}

/// Turns session metrics into indexed documents
#[derive(Clone)]
pub struct IngestService {
    index: Arc<dyn DocumentIndex>,
    tmp_dir: PathBuf,
}

impl IngestService {
    /// Create an ingestor writing temporary documents under `tmp_dir`
    #[must_use]
    pub fn new(index: Arc<dyn DocumentIndex>, tmp_dir: PathBuf) -> Self {
        Self { index, tmp_dir }
    }

    /// Render, upload, and clean up one session
    ///
    /// The owner always comes from the authenticated caller.
    ///
    /// # Errors
    ///
    /// Returns a generic ingestion failure if the document cannot be written
    /// or the index rejects it; the cause is kept as the error source.
    pub async fn ingest(
        &self,
        metrics: SessionMetrics,
        owner: &AuthenticatedUser,
    ) -> AppResult<IngestOutcome> {
        let record = SessionRecord::new(metrics, owner, Utc::now());
        let file_name = record.artifact_file_name();
        let path = self.tmp_dir.join(&file_name);

        write_artifact(&path, &record.to_markdown())
            .await
            .map_err(ingest_failed)?;

        let start = Instant::now();
        let uploaded = self
            .index
            .upload(DocumentUpload {
                path: &path,
                file_name: &file_name,
                user_id: &record.user_id,
            })
            .await;

        remove_artifact(&path).await;

        let upload_response = uploaded.map_err(ingest_failed)?;
        info!(
            user.id = %record.user_id,
            session.id = %record.session_id,
            index = self.index.name(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Session ingested"
        );

        Ok(IngestOutcome {
            session_id: record.session_id,
            upload_response,
        })
    }
}

fn ingest_failed(cause: AppError) -> AppError {
    AppError::new(ErrorCode::ExternalServiceError, messages::INGEST_FAILED).with_source(cause)
}

/// Write the temporary document, removing whatever a failed write left behind
async fn write_artifact(path: &Path, contents: &str) -> AppResult<()> {
    if let Err(e) = tokio::fs::write(path, contents).await {
        remove_artifact(path).await;
        return Err(AppError::storage("Failed to write session document").with_source(e));
    }
    Ok(())
}

/// Delete the temporary document; failure only warrants a warning
async fn remove_artifact(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            warn!("Failed to remove temporary session document {}: {e}", path.display());
        }
    }
}
