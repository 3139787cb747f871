//! Prompt validation
//!
//! Rejects topic requests that are too short, too long, or read like a
//! non-educational query. Runs before any call to the generation service.

use crate::error::PromptRejection;

/// Minimum trimmed prompt length, in characters
pub const MIN_PROMPT_CHARS: usize = 3;

/// Maximum trimmed prompt length, in characters
pub const MAX_PROMPT_CHARS: usize = 200;

/// Non-educational query markers, matched as lower-case substrings
pub const BLOCKED_KEYWORDS: &[&str] = &[
    "weather",
    "news",
    "today",
    "stock price",
    "sports score",
    "debug",
    "error",
    "fix my",
    "what is",
    "who is",
    "where is",
];

/// Validate a topic prompt
///
/// # Errors
/// Returns the first rejection category that applies, checking length
/// before the blocklist.
pub fn validate_prompt(prompt: &str) -> Result<(), PromptRejection> {
    let trimmed = prompt.trim();
    let len = trimmed.chars().count();

    if len < MIN_PROMPT_CHARS {
        return Err(PromptRejection::TooShort);
    }
    if len > MAX_PROMPT_CHARS {
        return Err(PromptRejection::TooLong);
    }
    if let Some(keyword) = blocked_keyword(trimmed) {
        return Err(PromptRejection::BlockedKeyword { keyword });
    }
    Ok(())
}

/// First blocklist entry contained in the prompt, if any
#[must_use]
pub fn blocked_keyword(prompt: &str) -> Option<&'static str> {
    let lowered = prompt.trim().to_lowercase();
    BLOCKED_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| lowered.contains(keyword))
}
