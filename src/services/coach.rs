// ABOUTME: Coach Query Responder: forwards one question to the provider scoped to the caller
// ABOUTME: Substitutes a fixed fallback reply when the provider produces no usable text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use pierre_relay_core::constants::messages;
use pierre_relay_core::errors::{AppError, AppResult, ErrorCode};
use pierre_relay_core::models::{AuthenticatedUser, CoachQuery};
use tracing::info;

use crate::llm::{CoachProvider, CoachRequest};

/// Answers coaching questions
#[derive(Clone)]
pub struct CoachService {
    provider: Arc<dyn CoachProvider>,
}

impl CoachService {
    /// Create a responder backed by `provider`
    #[must_use]
    pub fn new(provider: Arc<dyn CoachProvider>) -> Self {
        Self { provider }
    }

    /// Produce a reply for `asker`
    ///
    /// # Errors
    ///
    /// Returns a generic query failure when the provider call fails
    pub async fn reply(&self, query: &CoachQuery, asker: &AuthenticatedUser) -> AppResult<String> {
        let request = CoachRequest {
            user_id: &asker.id,
            message: &query.message,
        };

        let answer = self.provider.answer(&request).await.map_err(|e| {
            AppError::new(ErrorCode::ExternalServiceError, messages::QUERY_FAILED).with_source(e)
        })?;

        if let Some(text) = answer.filter(|text| !text.trim().is_empty()) {
            return Ok(text);
        }

        info!(
            user.id = %asker.id,
            provider = self.provider.name(),
            "Coach provider returned no text, using fallback reply"
        );
        Ok(messages::FALLBACK_REPLY.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedProvider {
        answer: AppResult<Option<String>>,
        asked: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedProvider {
        fn new(answer: AppResult<Option<String>>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                asked: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CoachProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn answer(&self, request: &CoachRequest<'_>) -> AppResult<Option<String>> {
            self.asked
                .lock()
                .unwrap()
                .push((request.user_id.to_owned(), request.message.to_owned()));
            match &self.answer {
                Ok(answer) => Ok(answer.clone()),
                Err(e) => Err(AppError::new(e.code, e.message.clone())),
            }
        }
    }

    fn query(message: &str) -> CoachQuery {
        CoachQuery {
            message: message.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_reply_is_passed_through_for_caller() {
        let provider = ScriptedProvider::new(Ok(Some("Great follow-through!".to_owned())));
        let service = CoachService::new(provider.clone());

        let reply = service
            .reply(&query("How am I doing?"), &AuthenticatedUser::new("user-3", None))
            .await
            .unwrap();

        assert_eq!(reply, "Great follow-through!");
        assert_eq!(
            provider.asked.lock().unwrap()[0],
            ("user-3".to_owned(), "How am I doing?".to_owned())
        );
    }

    #[tokio::test]
    async fn test_empty_answer_uses_fallback() {
        for answer in [None, Some(String::new()), Some("   ".to_owned())] {
            let service = CoachService::new(ScriptedProvider::new(Ok(answer)));
            let reply = service
                .reply(&query("How's my release timing?"), &AuthenticatedUser::new("u", None))
                .await
                .unwrap();
            assert_eq!(reply, messages::FALLBACK_REPLY);
        }
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic() {
        let service = CoachService::new(ScriptedProvider::new(Err(AppError::external_service(
            "OpenAI",
            "upstream said 503 with secret detail",
        ))));

        let error = service
            .reply(&query("Anything?"), &AuthenticatedUser::new("u", None))
            .await
            .unwrap_err();

        assert_eq!(error.message, messages::QUERY_FAILED);
        assert_eq!(error.http_status(), 500);
    }
}
