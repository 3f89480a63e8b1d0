// ABOUTME: System instructions for coaching replies loaded at compile time
// ABOUTME: Scopes the base coach prompt to the calling athlete's user id
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # System Prompts
//!
//! The base prompt lives in a markdown file next to this module so it can be
//! edited without touching code.

/// Base coaching instructions
pub const COACH_SYSTEM_PROMPT: &str = include_str!("coach_system.md");

/// Instructions for one request, restricted to the caller's documents
#[must_use]
pub fn coach_instructions(user_id: &str) -> String {
    format!(
        "{}\nThe athlete's user id is {user_id}. Only use session documents recorded for this user id.",
        COACH_SYSTEM_PROMPT.trim_end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructions_name_the_user() {
        let instructions = coach_instructions("user-42");
        assert!(instructions.starts_with("You are Pierre"));
        assert!(instructions.contains("user id is user-42"));
    }
}
