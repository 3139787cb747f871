//! Roadmap generator
//!
//! Orchestrates one generation request:
//! 1. Validate the topic prompt
//! 2. Build the instruction and call the generation service (bounded by timeout)
//! 3. Repair the returned text into a numbered, laid-out node list
//!
//! In development mode, transport failures and rejected requests are
//! answered with a placeholder roadmap instead of an error.

use crate::config::GeneratorConfig;
use crate::error::RoadmapError;
use crate::fallback::fallback_roadmap;
use crate::prompt::build_request;
use crate::repair::repair_with_report;
use crate::roadmap::Roadmap;
use crate::types::{Level, RoadmapNode, Style};
use crate::validation::validate_prompt;
use roadmap_llm::{CompletionClient, LlmError};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Roadmap generator
pub struct RoadmapGenerator {
    client: Arc<dyn CompletionClient>,
    config: GeneratorConfig,
}

impl fmt::Debug for RoadmapGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoadmapGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RoadmapGenerator {
    /// Create generator over a completion client
    #[inline]
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, config: GeneratorConfig) -> Self {
        Self { client, config }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate an ordered node list for a topic
    ///
    /// # Errors
    /// - `InvalidPrompt` before any service call
    /// - service errors mapped per [`RoadmapError::from`]
    /// - `Parse` / `Format` when the response cannot be repaired
    pub async fn generate(
        &self,
        prompt: &str,
        level: Level,
        style: Style,
    ) -> Result<Vec<RoadmapNode>, RoadmapError> {
        if let Err(rejection) = validate_prompt(prompt) {
            tracing::info!(%rejection, "prompt rejected");
            return Err(rejection.into());
        }
        let topic = prompt.trim();
        tracing::info!(topic, %level, %style, "generating roadmap");

        let request = build_request(topic, level, style, &self.config);
        let started = Instant::now();
        let outcome =
            tokio::time::timeout(self.config.request_timeout(), self.client.complete(request))
                .await
                .unwrap_or(Err(LlmError::Timeout {
                    duration_secs: self.config.request_timeout_secs,
                }));
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, elapsed_ms, "generation service call failed");
                return self.recover(err, topic, level);
            }
        };
        tracing::debug!(
            elapsed_ms,
            completion_tokens = response.usage.completion_tokens,
            "generation service answered"
        );

        let outcome = repair_with_report(&response.content)?;
        if !outcome.substituted.is_empty() || outcome.dropped_children > 0 {
            tracing::warn!(
                substituted = outcome.substituted.len(),
                dropped_children = outcome.dropped_children,
                "repaired generated roadmap"
            );
        }
        tracing::info!(nodes = outcome.nodes.len(), "roadmap generated");
        Ok(outcome.nodes)
    }

    /// Generate and wrap the result as an editable roadmap
    ///
    /// # Errors
    /// See [`Self::generate`].
    pub async fn generate_roadmap(
        &self,
        prompt: &str,
        level: Level,
        style: Style,
    ) -> Result<Roadmap, RoadmapError> {
        let nodes = self.generate(prompt, level, style).await?;
        Ok(Roadmap::new(prompt.trim(), level, style, nodes))
    }

    fn recover(
        &self,
        err: LlmError,
        topic: &str,
        level: Level,
    ) -> Result<Vec<RoadmapNode>, RoadmapError> {
        if self.config.mode.allows_fallback() && falls_back(&err) {
            tracing::warn!(error = %err, "using development placeholder roadmap");
            return Ok(fallback_roadmap(topic, level, &mut rand::rng()));
        }
        Err(err.into())
    }
}

/// Failures the development fallback may cover
fn falls_back(err: &LlmError) -> bool {
    err.is_transport() || matches!(err, LlmError::InvalidRequest(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptRejection;
    use crate::types::RunMode;
    use async_trait::async_trait;
    use mockall::mock;
    use roadmap_llm::{CompletionRequest, CompletionResponse, ResponseFormat};

    mock! {
        Service {}

        #[async_trait]
        impl CompletionClient for Service {
            async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
        }
    }

    fn generator(service: MockService, mode: RunMode) -> RoadmapGenerator {
        RoadmapGenerator::new(Arc::new(service), GeneratorConfig::new().with_mode(mode))
    }

    fn nodes_json(count: usize) -> String {
        let nodes: Vec<_> = (1..=count)
            .map(|i| {
                serde_json::json!({
                    "id": format!("node_{i}"),
                    "title": format!("Topic {i}"),
                    "description": ["learn it"],
                    "children": [],
                    "sequence": i,
                    "timeNeeded": 2
                })
            })
            .collect();
        serde_json::json!({ "nodes": nodes }).to_string()
    }

    #[tokio::test]
    async fn invalid_prompt_skips_service() {
        let mut service = MockService::new();
        service.expect_complete().never();

        let err = generator(service, RunMode::Production)
            .generate("hi", Level::Beginner, Style::WeekByWeek)
            .await
            .unwrap_err();
        assert_eq!(err, RoadmapError::InvalidPrompt(PromptRejection::TooShort));
    }

    #[tokio::test]
    async fn sends_json_mode_request_with_trimmed_topic() {
        let mut service = MockService::new();
        service
            .expect_complete()
            .withf(|req| {
                req.response_format == Some(ResponseFormat::JsonObject)
                    && req.messages[1].content.contains("\"Python\"")
            })
            .times(1)
            .returning(|_| Ok(CompletionResponse::text(nodes_json(8))));

        let nodes = generator(service, RunMode::Production)
            .generate("  Python ", Level::Beginner, Style::WeekByWeek)
            .await
            .unwrap();
        assert_eq!(nodes.len(), 8);
    }

    #[tokio::test]
    async fn rate_limit_is_surfaced_in_production() {
        let mut service = MockService::new();
        service
            .expect_complete()
            .returning(|_| Err(LlmError::RateLimit("slow down".into())));

        let err = generator(service, RunMode::Production)
            .generate("Python", Level::Beginner, Style::WeekByWeek)
            .await
            .unwrap_err();
        assert_eq!(err, RoadmapError::ServiceRateLimited);
    }

    #[tokio::test]
    async fn bad_request_falls_back_in_development() {
        let mut service = MockService::new();
        service
            .expect_complete()
            .returning(|_| Err(LlmError::InvalidRequest("bad".into())));

        let nodes = generator(service, RunMode::Development)
            .generate("Python", Level::Intermediate, Style::TopicWise)
            .await
            .unwrap();
        assert_eq!(nodes.len(), 12);
        assert!(nodes[0].title.contains("Python"));
    }

    #[tokio::test]
    async fn bad_request_is_an_error_in_production() {
        let mut service = MockService::new();
        service
            .expect_complete()
            .returning(|_| Err(LlmError::InvalidRequest("bad".into())));

        let err = generator(service, RunMode::Production)
            .generate("Python", Level::Intermediate, Style::TopicWise)
            .await
            .unwrap_err();
        assert!(matches!(err, RoadmapError::ServiceBadRequest(_)));
    }

    #[tokio::test]
    async fn rate_limit_does_not_fall_back_in_development() {
        let mut service = MockService::new();
        service
            .expect_complete()
            .returning(|_| Err(LlmError::RateLimit(String::new())));

        let err = generator(service, RunMode::Development)
            .generate("Python", Level::Beginner, Style::WeekByWeek)
            .await
            .unwrap_err();
        assert_eq!(err, RoadmapError::ServiceRateLimited);
    }

    #[tokio::test]
    async fn unparsable_response_is_a_parse_error() {
        let mut service = MockService::new();
        service
            .expect_complete()
            .returning(|_| Ok(CompletionResponse::text("I cannot do that.")));

        let err = generator(service, RunMode::Development)
            .generate("Python", Level::Beginner, Style::WeekByWeek)
            .await
            .unwrap_err();
        assert!(matches!(err, RoadmapError::Parse(_)));
    }

    #[tokio::test]
    async fn generate_roadmap_wraps_nodes() {
        let mut service = MockService::new();
        service
            .expect_complete()
            .returning(|_| Ok(CompletionResponse::text(nodes_json(3))));

        let roadmap = generator(service, RunMode::Production)
            .generate_roadmap(" Rust ", Level::Advanced, Style::TopicWise)
            .await
            .unwrap();
        assert_eq!(roadmap.topic, "Rust");
        assert_eq!(roadmap.level, Level::Advanced);
        assert_eq!(roadmap.nodes().len(), 3);
    }
}
