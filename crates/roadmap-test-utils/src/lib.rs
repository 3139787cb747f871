//! Testing utilities for the roadmap workspace
//!
//! Scripted completion clients and raw response fixtures.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use roadmap_llm::{CompletionClient, CompletionRequest, CompletionResponse, LlmError};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::time::Duration;

/// Client that replays a fixed script of replies and records every request
///
/// Once the script is exhausted the last reply is repeated.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    last: Mutex<Option<Result<CompletionResponse, LlmError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client that always answers with `content`
    pub fn replying(content: impl Into<String>) -> Self {
        Self::new().then_reply(content)
    }

    /// Client that always fails with `err`
    pub fn failing(err: LlmError) -> Self {
        Self::new().then_fail(err)
    }

    pub fn then_reply(self, content: impl Into<String>) -> Self {
        self.replies
            .lock()
            .push_back(Ok(CompletionResponse::text(content)));
        self
    }

    pub fn then_fail(self, err: LlmError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().push(request);

        let next = self.replies.lock().pop_front();
        let mut last = self.last.lock();
        if let Some(reply) = next {
            *last = Some(reply);
        }
        last.clone()
            .unwrap_or_else(|| Err(LlmError::Network("script is empty".into())))
    }
}

/// Client that answers only after `delay`
///
/// Pair with a paused tokio clock to exercise request timeouts.
#[derive(Debug, Clone)]
pub struct SlowClient {
    pub delay: Duration,
    pub content: String,
}

impl SlowClient {
    pub fn new(delay: Duration, content: impl Into<String>) -> Self {
        Self {
            delay,
            content: content.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for SlowClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        tokio::time::sleep(self.delay).await;
        Ok(CompletionResponse::text(self.content.clone()))
    }
}

/// One raw node as the generation service would emit it
pub fn raw_node(ordinal: usize, children: &[usize]) -> Value {
    json!({
        "id": format!("node_{ordinal}"),
        "title": format!("{ordinal}. Step {ordinal}"),
        "description": [format!("Learn part {ordinal}"), "Practice"],
        "children": children.iter().map(|c| format!("node_{c}")).collect::<Vec<_>>(),
        "sequence": ordinal,
        "timeNeeded": 2
    })
}

/// Well-formed `{"nodes": [...]}` body with `count` nodes in a binary tree
pub fn raw_nodes_json(count: usize) -> String {
    let nodes: Vec<Value> = (1..=count)
        .map(|i| {
            let children: Vec<usize> = [2 * i, 2 * i + 1]
                .into_iter()
                .filter(|c| *c <= count)
                .collect();
            raw_node(i, &children)
        })
        .collect();
    json!({ "nodes": nodes }).to_string()
}

/// Wrap a body the way chatty models do: prose and a code fence around it
pub fn wrapped_in_prose(body: &str) -> String {
    format!("Sure! Here is your roadmap:\n```json\n{body}\n```\nGood luck!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn script_repeats_last_reply() {
        let client = ScriptedClient::new()
            .then_fail(LlmError::RateLimit("busy".into()))
            .then_reply("{}");

        let first = client.complete(CompletionRequest::default()).await;
        assert_eq!(first, Err(LlmError::RateLimit("busy".into())));
        for _ in 0..2 {
            let reply = client.complete(CompletionRequest::default()).await;
            assert_eq!(reply.map(|r| r.content), Ok("{}".to_string()));
        }
        assert_eq!(client.call_count(), 3);
    }

    #[test]
    fn fixture_tree_shape() {
        let value: Value = serde_json::from_str(&raw_nodes_json(5)).unwrap();
        let nodes = value["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0]["children"], json!(["node_2", "node_3"]));
        assert_eq!(nodes[4]["children"], json!([]));
    }
}
