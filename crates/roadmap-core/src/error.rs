//! Error types for roadmap core
//!
//! Covers:
//! - Prompt rejection before any external call
//! - Generation service failures mapped to domain kinds
//! - Unusable service output (parse / format)
//! - Configuration loading

use roadmap_llm::LlmError;
use std::path::PathBuf;

/// Main roadmap error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoadmapError {
    /// Prompt rejected by the validator
    #[error("invalid prompt: {0}")]
    InvalidPrompt(#[from] PromptRejection),

    /// Required credential or configuration missing
    #[error("auth configuration error: {0}")]
    AuthConfig(String),

    /// Generation service rejected our credentials
    #[error("generation service unauthorized")]
    ServiceUnauthorized,

    /// Generation service is throttling
    #[error("generation service rate limited")]
    ServiceRateLimited,

    /// Generation service rejected the request
    #[error("generation service bad request: {0}")]
    ServiceBadRequest(String),

    /// Generation service did not answer in time
    #[error("generation service timed out after {duration_secs}s")]
    ServiceTimeout { duration_secs: u64 },

    /// No JSON object could be recovered from the response
    #[error("parse error: {0}")]
    Parse(String),

    /// JSON recovered but it does not carry a usable node list
    #[error("format error: {0}")]
    Format(String),

    /// Node id not present in the roadmap
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// Catch-all generation failure
    #[error("generation failed: {0}")]
    GenerationFailed(String),
}

impl RoadmapError {
    /// Text safe to show to the end user
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidPrompt(PromptRejection::BlockedKeyword { .. }) => {
                "Please enter an educational topic you want to learn."
            }
            Self::InvalidPrompt(_) => "Please enter a topic between 3 and 200 characters.",
            Self::AuthConfig(_) => "Roadmap generation is not configured. Please contact support.",
            Self::ServiceUnauthorized => {
                "The AI service rejected our credentials. Please try again later."
            }
            Self::ServiceRateLimited => {
                "Too many requests right now. Please wait a moment and try again."
            }
            Self::ServiceBadRequest(_) => {
                "The roadmap request could not be processed. Please try a different topic."
            }
            Self::ServiceTimeout { .. } => {
                "The AI service took too long to respond. Please try again."
            }
            Self::Parse(_) | Self::Format(_) => {
                "The AI returned an unreadable roadmap. Please try again."
            }
            Self::NodeNotFound(_) => "That roadmap step no longer exists.",
            Self::GenerationFailed(_) => "Failed to generate roadmap. Please try again.",
        }
    }

    /// Check if re-invoking generation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ServiceRateLimited
                | Self::ServiceTimeout { .. }
                | Self::Parse(_)
                | Self::Format(_)
                | Self::GenerationFailed(_)
        )
    }
}

impl From<LlmError> for RoadmapError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingConfig(what) => Self::AuthConfig(what),
            LlmError::Auth(_) => Self::ServiceUnauthorized,
            LlmError::RateLimit(_) => Self::ServiceRateLimited,
            LlmError::InvalidRequest(body) => Self::ServiceBadRequest(body),
            LlmError::Timeout { duration_secs } => Self::ServiceTimeout { duration_secs },
            LlmError::ApiError { status, .. } => {
                Self::GenerationFailed(format!("service returned status {status}"))
            }
            LlmError::Network(_) => {
                Self::GenerationFailed("generation service unreachable".to_string())
            }
            LlmError::Parsing(msg) => Self::GenerationFailed(msg),
        }
    }
}

/// Why a prompt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PromptRejection {
    /// Trimmed prompt below the minimum length
    #[error("too short")]
    TooShort,

    /// Trimmed prompt above the maximum length
    #[error("too long")]
    TooLong,

    /// Prompt contains a non-educational marker
    #[error("blocked keyword")]
    BlockedKeyword {
        /// First matching blocklist entry
        keyword: &'static str,
    },
}

/// Unrecognised textual enum value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownVariant {
    /// Enum being parsed
    pub kind: &'static str,
    /// Offending input
    pub value: String,
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid configuration TOML
    #[error("invalid configuration: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roadmap_error_display() {
        let err = RoadmapError::InvalidPrompt(PromptRejection::TooShort);
        assert_eq!(err.to_string(), "invalid prompt: too short");

        let err = RoadmapError::InvalidPrompt(PromptRejection::BlockedKeyword { keyword: "news" });
        assert_eq!(err.to_string(), "invalid prompt: blocked keyword");
    }

    #[test]
    fn rate_limit_message_differs_from_generic() {
        let limited = RoadmapError::ServiceRateLimited.user_message();
        let generic = RoadmapError::GenerationFailed("x".into()).user_message();
        assert_ne!(limited, generic);
        assert!(limited.contains("Too many requests"));
    }

    #[test]
    fn llm_error_mapping() {
        assert_eq!(
            RoadmapError::from(LlmError::Auth("k".into())),
            RoadmapError::ServiceUnauthorized
        );
        assert_eq!(
            RoadmapError::from(LlmError::RateLimit(String::new())),
            RoadmapError::ServiceRateLimited
        );
        assert!(matches!(
            RoadmapError::from(LlmError::InvalidRequest("bad".into())),
            RoadmapError::ServiceBadRequest(_)
        ));
        assert!(matches!(
            RoadmapError::from(LlmError::MissingConfig("OPENAI_API_KEY".into())),
            RoadmapError::AuthConfig(_)
        ));
        assert_eq!(
            RoadmapError::from(LlmError::Timeout { duration_secs: 30 }),
            RoadmapError::ServiceTimeout { duration_secs: 30 }
        );
    }

    #[test]
    fn network_details_do_not_leak() {
        let err = RoadmapError::from(LlmError::Network("dns error: api.internal:443".into()));
        assert!(!err.to_string().contains("api.internal"));
    }

    #[test]
    fn retryable_classification() {
        assert!(RoadmapError::ServiceRateLimited.is_retryable());
        assert!(RoadmapError::ServiceTimeout { duration_secs: 30 }.is_retryable());
        assert!(!RoadmapError::InvalidPrompt(PromptRejection::TooLong).is_retryable());
        assert!(!RoadmapError::AuthConfig("x".into()).is_retryable());
    }
}
