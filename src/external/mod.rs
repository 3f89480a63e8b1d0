// ABOUTME: External API client modules
// ABOUTME: Shared authenticated OpenAI client used by the vector store and coach provider
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! External API Clients

pub mod openai;

pub use openai::{OpenAiClient, OpenAiErrorResponse};
