//! Request and response types for chat completion

use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instruction-setting message
    System,
    /// End-user message
    User,
    /// Model output
    Assistant,
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author
    pub role: MessageRole,
    /// Text
    pub content: String,
}

impl ChatMessage {
    /// System message
    #[inline]
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// User message
    #[inline]
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Output mode the service is asked to honour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    /// Free text
    Text,
    /// A single JSON object, no prose
    JsonObject,
}

/// Chat-completion request
///
/// Unset sampling parameters are left to the service defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionRequest {
    /// Model override; the client's configured model is used when `None`
    pub model: Option<String>,
    /// Conversation
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Output token ceiling
    pub max_tokens: Option<u32>,
    /// Nucleus sampling mass
    pub top_p: Option<f32>,
    /// Repetition penalty
    pub frequency_penalty: Option<f32>,
    /// Forced output format
    pub response_format: Option<ResponseFormat>,
}

impl CompletionRequest {
    /// Create request from messages
    #[inline]
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// With model override
    #[inline]
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// With temperature
    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// With max tokens
    #[inline]
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// With nucleus sampling
    #[inline]
    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// With frequency penalty
    #[inline]
    #[must_use]
    pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    /// With forced response format
    #[inline]
    #[must_use]
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }
}

/// Token accounting reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    pub prompt_tokens: u32,
    /// Completion tokens
    pub completion_tokens: u32,
}

/// Chat-completion response
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionResponse {
    /// First choice's message content (empty when the service sent none)
    pub content: String,
    /// Token usage, zero when not reported
    pub usage: Usage,
}

impl CompletionResponse {
    /// Response carrying only content
    #[inline]
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: Usage::default(),
        }
    }
}
