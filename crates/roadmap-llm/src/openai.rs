//! OpenAI-compatible chat-completion client

use crate::client::CompletionClient;
use crate::error::LlmError;
use crate::types::{ChatMessage, CompletionRequest, CompletionResponse, ResponseFormat, Usage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Default endpoint root
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bearer token
    pub api_key: String,
    /// Endpoint root without trailing slash
    pub base_url: String,
    /// Default model identifier
    pub model: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create configuration with default endpoint, model and timeout
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read `OPENAI_API_KEY` (required), `OPENAI_BASE_URL` and `OPENAI_MODEL`
    ///
    /// # Errors
    /// Returns `LlmError::MissingConfig` when the API key is absent or blank.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source
    ///
    /// # Errors
    /// Returns `LlmError::MissingConfig` when the API key is absent or blank.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingConfig("OPENAI_API_KEY not set".to_string()))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = lookup("OPENAI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// With endpoint root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// With default model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// With per-request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// HTTP client for `/chat/completions` endpoints
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    /// Build client from configuration
    ///
    /// # Errors
    /// Returns `LlmError::Network` when the HTTP stack cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;
        Ok(Self { config, http })
    }

    /// Build client from environment
    ///
    /// # Errors
    /// See [`ClientConfig::from_env`] and [`Self::new`].
    pub fn from_env() -> Result<Self, LlmError> {
        ClientConfig::from_env().and_then(Self::new)
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn map_send_error(&self, err: &reqwest::Error) -> LlmError {
        if err.is_timeout() {
            LlmError::Timeout {
                duration_secs: self.config.timeout.as_secs(),
            }
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = RequestBody {
            model: request.model.as_deref().unwrap_or(&self.config.model),
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            frequency_penalty: request.frequency_penalty,
            response_format: request.response_format,
        };

        let started = Instant::now();
        let res = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;
        let status = res.status();
        let text = res.text().await.map_err(|e| self.map_send_error(&e))?;
        tracing::debug!(
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat completion returned"
        );

        if !status.is_success() {
            return Err(LlmError::from_status(status.as_u16(), text));
        }

        let parsed: ResponseBody =
            serde_json::from_str(&text).map_err(|e| LlmError::Parsing(e.to_string()))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(CompletionResponse {
            content,
            usage: parsed.usage.unwrap_or_default(),
        })
    }
}
