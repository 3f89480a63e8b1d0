// ABOUTME: External semantic index that stores rendered session documents
// ABOUTME: Defines the DocumentIndex seam and the OpenAI vector store implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Document Index
//!
//! Ownership of an uploaded document passes to the index: the relay keeps
//! no copy and has no update or delete path.

use async_trait::async_trait;
use pierre_relay_core::errors::AppResult;
use serde_json::Value;
use std::path::Path;

/// `OpenAI` vector store backend
pub mod openai;

pub use openai::OpenAiVectorStore;

/// A document ready for upload
#[derive(Debug, Clone, Copy)]
pub struct DocumentUpload<'a> {
    /// Local file holding the document
    pub path: &'a Path,
    /// File name presented to the index
    pub file_name: &'a str,
    /// Owner, recorded on the indexed entry so retrieval can be scoped per user
    pub user_id: &'a str,
}

/// Stores documents for later retrieval
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Upload one document and wait until the index has accepted it
    ///
    /// Returns the index's final acknowledgment, passed through to the client
    /// as an opaque value.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the index is unreachable,
    /// or the index reports that processing failed
    async fn upload(&self, document: DocumentUpload<'_>) -> AppResult<Value>;
}
