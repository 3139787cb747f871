//! Completion client contract

use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;

/// Asynchronous chat-completion service
///
/// One call per request; implementations must not retry on their own.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send the request and return the first choice's content
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
