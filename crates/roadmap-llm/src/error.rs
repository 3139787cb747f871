//! Errors raised while talking to the generation service

/// Chat-completion call failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LlmError {
    /// Required client configuration is absent (API key, base URL)
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// Service rejected the credentials (401/403)
    #[error("auth failed: {0}")]
    Auth(String),

    /// Service is throttling requests (429)
    #[error("rate limit: {0}")]
    RateLimit(String),

    /// Service rejected the request shape (other 4xx)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Service-side failure (5xx or unexpected status)
    #[error("api error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Connection could not be established or was dropped
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its time budget
    #[error("request timed out after {duration_secs}s")]
    Timeout {
        /// Budget that was exceeded
        duration_secs: u64,
    },

    /// Response body was not a chat-completion payload
    #[error("parsing failed: {0}")]
    Parsing(String),
}

impl LlmError {
    /// Map a non-success HTTP status and its body to an error
    #[must_use]
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth(body),
            429 => Self::RateLimit(body),
            400..=499 => Self::InvalidRequest(body),
            _ => Self::ApiError {
                status,
                message: body,
            },
        }
    }

    /// Whether the failure happened below the HTTP layer
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }
}
