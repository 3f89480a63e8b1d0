// ABOUTME: Generative answer provider abstraction for coaching replies
// ABOUTME: Defines the CoachProvider contract and re-exports the OpenAI Responses implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Coach Provider Interface
//!
//! A provider takes one question plus the caller's id and returns the
//! generated answer. Retrieval over the caller's indexed sessions happens
//! inside the provider's own service; the relay only scopes it.
//!
//! ```rust,no_run
//! use pierre_coach_relay::llm::{CoachProvider, CoachRequest};
//!
//! async fn example(provider: &dyn CoachProvider) {
//!     let request = CoachRequest {
//!         user_id: "user-1",
//!         message: "How's my release timing?",
//!     };
//!     let reply = provider.answer(&request).await;
//! }
//! ```

mod openai;
pub mod prompts;

pub use openai::OpenAiCoachProvider;
pub use prompts::coach_instructions;

use async_trait::async_trait;
use pierre_relay_core::errors::AppResult;

/// One coaching question
#[derive(Debug, Clone, Copy)]
pub struct CoachRequest<'a> {
    /// Authenticated caller
    pub user_id: &'a str,
    /// Validated question text
    pub message: &'a str,
}

/// Produces grounded coaching answers
#[async_trait]
pub trait CoachProvider: Send + Sync {
    /// Unique provider identifier
    fn name(&self) -> &'static str;

    /// Model used for answers
    fn model(&self) -> &str;

    /// Generate an answer
    ///
    /// Returns `Ok(None)` when the service responded but produced no text.
    ///
    /// # Errors
    ///
    /// Returns an error if the service is unreachable or rejects the request
    async fn answer(&self, request: &CoachRequest<'_>) -> AppResult<Option<String>>;
}
