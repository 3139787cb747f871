//! Generation instruction
//!
//! Builds the system and user messages sent to the generation service.

use crate::config::GeneratorConfig;
use crate::types::{Level, Style};
use roadmap_llm::{ChatMessage, CompletionRequest, ResponseFormat};

/// System instruction demanding JSON-only output
pub const SYSTEM_INSTRUCTION: &str = "You are an expert curriculum designer. \
You respond with a single JSON object containing a \"nodes\" array and nothing else: \
no prose, no markdown, no code fences.";

/// User instruction for one roadmap request
#[must_use]
pub fn user_instruction(topic: &str, level: Level, style: Style) -> String {
    let count = level.node_count_band();
    let hours = level.hours_band();
    format!(
        "Create a {level} learning roadmap for \"{topic}\".\n\
         {guidance}\n\
         \n\
         Requirements:\n\
         - Produce between {min_nodes} and {max_nodes} nodes.\n\
         - Every node has: \"id\" (\"node_1\", \"node_2\", ...), \"title\", \"description\" \
         (array of 3-5 short bullet points), \"children\" (array of node ids), \
         \"sequence\" (1-based reading order), \"timeNeeded\" (hours, number).\n\
         - Titles start with the sequence number, e.g. \"1. Introduction\".\n\
         - Each node has at most two children; children reference ids in this roadmap.\n\
         - Allocate between {min_hours} and {max_hours} hours per node.\n\
         \n\
         Return only a JSON object of the form {{\"nodes\": [...]}}.",
        level = level,
        topic = topic,
        guidance = style.guidance(),
        min_nodes = count.start(),
        max_nodes = count.end(),
        min_hours = hours.start(),
        max_hours = hours.end(),
    )
}

/// Full completion request for a validated topic
#[must_use]
pub fn build_request(
    topic: &str,
    level: Level,
    style: Style,
    config: &GeneratorConfig,
) -> CompletionRequest {
    let mut request = CompletionRequest::new(vec![
        ChatMessage::system(SYSTEM_INSTRUCTION),
        ChatMessage::user(user_instruction(topic, level, style)),
    ])
    .with_temperature(config.temperature)
    .with_max_tokens(config.max_tokens)
    .with_top_p(config.top_p)
    .with_frequency_penalty(config.frequency_penalty)
    .with_response_format(ResponseFormat::JsonObject);

    if let Some(model) = &config.model {
        request = request.with_model(model.clone());
    }
    request
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadmap_llm::MessageRole;

    #[test]
    fn instruction_carries_level_bands() {
        let text = user_instruction("Rust", Level::Intermediate, Style::TopicWise);
        assert!(text.contains("\"Rust\""));
        assert!(text.contains("between 11 and 15 nodes"));
        assert!(text.contains("between 2 and 6 hours"));
        assert!(text.contains("at most two children"));
        assert!(text.contains(Style::TopicWise.guidance()));
    }

    #[test]
    fn advanced_bands() {
        let text = user_instruction("Compilers", Level::Advanced, Style::WeekByWeek);
        assert!(text.contains("between 15 and 18 nodes"));
        assert!(text.contains("between 4 and 10 hours"));
    }

    #[test]
    fn request_forces_json_mode() {
        let config = GeneratorConfig::new().with_model("m-1");
        let request = build_request("Go", Level::Beginner, Style::WeekByWeek, &config);

        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.messages[1].role, MessageRole::User);
        assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
        assert_eq!(request.model.as_deref(), Some("m-1"));
        assert_eq!(request.max_tokens, Some(config.max_tokens));
    }
}
