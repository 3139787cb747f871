//! Roadmap LLM backend
//!
//! The external generation service seen from the roadmap core:
//! - `CompletionClient`: async chat-completion contract
//! - `CompletionRequest` / `CompletionResponse`: request and response types
//! - `OpenAiClient`: OpenAI-compatible HTTP implementation (reqwest)
//! - `LlmError`: transport and service failures
//!
//! # Example
//!
//! ```rust,ignore
//! use roadmap_llm::{ChatMessage, ClientConfig, CompletionClient, CompletionRequest, OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(ClientConfig::from_env()?)?;
//! let request = CompletionRequest::new(vec![ChatMessage::user("Say hi")]);
//! let response = client.complete(request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod client;
pub mod error;
pub mod openai;
pub mod types;

pub use client::CompletionClient;
pub use error::LlmError;
pub use openai::{ClientConfig, OpenAiClient, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use types::{
    ChatMessage, CompletionRequest, CompletionResponse, MessageRole, ResponseFormat, Usage,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
