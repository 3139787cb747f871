//! Editable roadmap
//!
//! Holds a generated node list and applies edits coming back from the UI.
//! Structural fields (`id`, `sequence`, `children`, `position`) stay owned
//! by the roadmap; edits only touch progress and wording.

use crate::error::RoadmapError;
use crate::repair::{renumber_title, DESCRIPTION_PLACEHOLDER};
use crate::types::{Level, RoadmapNode, Style};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated learning plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roadmap {
    pub topic: String,
    pub level: Level,
    pub style: Style,
    nodes: Vec<RoadmapNode>,
}

/// Aggregate progress over a roadmap
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub hours_needed: f64,
    pub hours_consumed: f64,
}

impl Progress {
    /// Completed share in `[0, 1]`; zero for an empty roadmap
    #[must_use]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

impl Roadmap {
    /// Wrap an already repaired node list
    #[must_use]
    pub fn new(
        topic: impl Into<String>,
        level: Level,
        style: Style,
        nodes: Vec<RoadmapNode>,
    ) -> Self {
        Self {
            topic: topic.into(),
            level,
            style,
            nodes,
        }
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[RoadmapNode] {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: &str) -> Option<&RoadmapNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Apply a full updated node submitted by the editor
    ///
    /// `completion_time` is stamped with `now` only when `completed` flips
    /// from false to true, and cleared when it flips back.
    ///
    /// # Errors
    /// `RoadmapError::NodeNotFound` when `update.id` is not in the roadmap.
    pub fn apply_update(
        &mut self,
        update: RoadmapNode,
        now: DateTime<Utc>,
    ) -> Result<&RoadmapNode, RoadmapError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == update.id)
            .ok_or_else(|| RoadmapError::NodeNotFound(update.id.clone()))?;

        match (node.completed, update.completed) {
            (false, true) => node.completion_time = Some(now),
            (true, false) => node.completion_time = None,
            _ => {}
        }
        node.completed = update.completed;

        node.time_consumed = if update.time_consumed.is_finite() {
            update.time_consumed.max(0.0)
        } else {
            0.0
        };
        node.deadline = update.deadline.filter(|d| !d.trim().is_empty());

        let title = update.title.trim();
        if !title.is_empty() {
            node.title = renumber_title(title, node.sequence);
        }

        let description: Vec<String> = update
            .description
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        node.description = if description.is_empty() {
            vec![DESCRIPTION_PLACEHOLDER.to_string()]
        } else {
            description
        };

        tracing::debug!(id = %node.id, completed = node.completed, "node updated");
        Ok(node)
    }

    /// Completion and effort totals
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.nodes.iter().fold(
            Progress {
                total: self.nodes.len(),
                ..Progress::default()
            },
            |mut acc, node| {
                if node.completed {
                    acc.completed += 1;
                }
                acc.hours_needed += node.time_needed;
                acc.hours_consumed += node.time_consumed;
                acc
            },
        )
    }
}
