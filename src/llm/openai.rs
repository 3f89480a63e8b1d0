// ABOUTME: OpenAI Responses API provider with file_search over the session vector store
// ABOUTME: Filters retrieval by user_id attribute and extracts output_text from message items
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use async_trait::async_trait;
use pierre_relay_core::errors::AppResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{coach_instructions, CoachProvider, CoachRequest};
use crate::config::OpenAiConfig;
use crate::external::OpenAiClient;

/// Provider identifier
const PROVIDER_NAME: &str = "openai";

// ============================================================================
// Responses API wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: String,
    input: &'a str,
    tools: [FileSearchTool<'a>; 1],
}

#[derive(Debug, Serialize)]
struct FileSearchTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    vector_store_ids: [&'a str; 1],
    filters: AttributeFilter<'a>,
}

#[derive(Debug, Serialize)]
struct AttributeFilter<'a> {
    #[serde(rename = "type")]
    comparison: &'static str,
    key: &'static str,
    value: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    part_type: String,
    #[serde(default)]
    text: Option<String>,
}

impl ResponsesResponse {
    /// Concatenate every `output_text` part of every message item
    fn output_text(&self) -> Option<String> {
        let text: String = self
            .output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| &item.content)
            .filter(|part| part.part_type == "output_text")
            .filter_map(|part| part.text.as_deref())
            .collect();

        let trimmed = text.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Coach provider backed by the `OpenAI` Responses API
pub struct OpenAiCoachProvider {
    api: OpenAiClient,
    model: String,
    vector_store_id: String,
}

impl OpenAiCoachProvider {
    /// Create a provider answering from one vector store
    #[must_use]
    pub fn new(api: OpenAiClient, config: &OpenAiConfig) -> Self {
        Self {
            api,
            model: config.model.clone(),
            vector_store_id: config.vector_store_id.clone(),
        }
    }

    fn build_request<'a>(&'a self, request: &CoachRequest<'a>) -> ResponsesRequest<'a> {
        ResponsesRequest {
            model: self.model.as_str(),
            instructions: coach_instructions(request.user_id),
            input: request.message,
            tools: [FileSearchTool {
                tool_type: "file_search",
                vector_store_ids: [self.vector_store_id.as_str()],
                filters: AttributeFilter {
                    comparison: "eq",
                    key: "user_id",
                    value: request.user_id,
                },
            }],
        }
    }
}

#[async_trait]
impl CoachProvider for OpenAiCoachProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn answer(&self, request: &CoachRequest<'_>) -> AppResult<Option<String>> {
        let body = self.build_request(request);
        debug!(
            "Sending coaching question ({} chars) to {PROVIDER_NAME}",
            request.message.chars().count()
        );

        let response: ResponsesResponse = self
            .api
            .send_json(self.api.post("responses").json(&body), "generate reply")
            .await?;

        Ok(response.output_text())
    }
}
