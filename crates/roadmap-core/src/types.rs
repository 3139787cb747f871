//! Core types for roadmaps
//!
//! Defines:
//! - `RoadmapNode`, the single domain entity
//! - `Position`, the derived display coordinate
//! - `Level` and `Style`, the generation parameters
//! - `RunMode`, production vs development behaviour

use crate::error::UnknownVariant;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Display coordinate computed by the layout engine
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One topic/unit within a roadmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapNode {
    /// `node_<n>`, unique within a roadmap
    pub id: String,
    /// Always starts with `"<sequence>. "`
    pub title: String,
    /// Bullet points, never empty once repaired
    pub description: Vec<String>,
    /// Ids of child nodes in the same roadmap
    pub children: Vec<String>,
    /// Reading order, contiguous `1..=N`
    pub sequence: u32,
    /// Estimated effort in hours
    pub time_needed: f64,
    /// Reported progress in hours
    #[serde(default)]
    pub time_consumed: f64,
    #[serde(default)]
    pub completed: bool,
    /// Set on the false -> true transition of `completed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default)]
    pub position: Position,
}

impl RoadmapNode {
    /// Create node with no progress and no children
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>, sequence: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: Vec::new(),
            children: Vec::new(),
            sequence,
            time_needed: 0.0,
            time_consumed: 0.0,
            completed: false,
            completion_time: None,
            deadline: None,
            position: Position::default(),
        }
    }

    /// With description bullets
    #[inline]
    #[must_use]
    pub fn with_description<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description = items.into_iter().map(Into::into).collect();
        self
    }

    /// With child ids
    #[inline]
    #[must_use]
    pub fn with_children<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = ids.into_iter().map(Into::into).collect();
        self
    }

    /// With estimated hours
    #[inline]
    #[must_use]
    pub fn with_time_needed(mut self, hours: f64) -> Self {
        self.time_needed = hours;
        self
    }

    /// Canonical id for a 1-based position
    #[inline]
    #[must_use]
    pub fn id_for(ordinal: usize) -> String {
        format!("node_{ordinal}")
    }
}

/// Learner level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// All levels, easiest first
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    /// Node count band requested from the service
    #[inline]
    #[must_use]
    pub fn node_count_band(&self) -> RangeInclusive<u32> {
        match self {
            Level::Beginner => 8..=10,
            Level::Intermediate => 11..=15,
            Level::Advanced => 15..=18,
        }
    }

    /// Per-node hour band requested from the service
    #[inline]
    #[must_use]
    pub fn hours_band(&self) -> RangeInclusive<u32> {
        match self {
            Level::Beginner => 1..=4,
            Level::Intermediate => 2..=6,
            Level::Advanced => 4..=10,
        }
    }

    /// Size of the development-mode placeholder roadmap
    #[inline]
    #[must_use]
    pub fn fallback_node_count(&self) -> usize {
        match self {
            Level::Beginner => 8,
            Level::Intermediate => 12,
            Level::Advanced => 15,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            _ => Err(UnknownVariant {
                kind: "level",
                value: s.to_string(),
            }),
        }
    }
}

/// Roadmap organisation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Style {
    #[default]
    #[serde(rename = "week-by-week")]
    WeekByWeek,
    #[serde(rename = "topic-wise")]
    TopicWise,
}

impl Style {
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::WeekByWeek => "week-by-week",
            Style::TopicWise => "topic-wise",
        }
    }

    /// Organisation hint embedded in the generation instruction
    #[inline]
    #[must_use]
    pub fn guidance(&self) -> &'static str {
        match self {
            Style::WeekByWeek => {
                "Organize the roadmap as a week-by-week plan; each node covers one week of study."
            }
            Style::TopicWise => {
                "Organize the roadmap by topic; each node covers one self-contained subject area."
            }
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Style {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week-by-week" | "weekly" => Ok(Style::WeekByWeek),
            "topic-wise" | "topic" => Ok(Style::TopicWise),
            _ => Err(UnknownVariant {
                kind: "style",
                value: s.to_string(),
            }),
        }
    }
}

/// Whether the development fallback may replace failed service calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    #[default]
    Production,
    Development,
}

impl RunMode {
    /// Read `ROADMAP_MODE`; only `development`/`dev` selects development
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_value(std::env::var("ROADMAP_MODE").ok().as_deref())
    }

    fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "development" || v == "dev" => RunMode::Development,
            _ => RunMode::Production,
        }
    }

    #[inline]
    #[must_use]
    pub fn allows_fallback(&self) -> bool {
        matches!(self, RunMode::Development)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_serializes_camel_case() {
        let node = RoadmapNode::new("node_1", "1. Basics", 1).with_time_needed(2.0);
        let json = serde_json::to_value(&node).unwrap();

        assert_eq!(json["timeNeeded"], 2.0);
        assert_eq!(json["timeConsumed"], 0.0);
        assert!(json.get("completionTime").is_none());
        assert_eq!(json["position"]["x"], 0.0);
    }

    #[test]
    fn level_parsing() {
        assert_eq!("Beginner".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!(" advanced ".parse::<Level>().unwrap(), Level::Advanced);
        let err = "expert".parse::<Level>().unwrap_err();
        assert_eq!(err.kind, "level");
    }

    #[test]
    fn style_parsing_and_serde() {
        assert_eq!("topic-wise".parse::<Style>().unwrap(), Style::TopicWise);
        assert_eq!(
            serde_json::to_value(Style::WeekByWeek).unwrap(),
            serde_json::json!("week-by-week")
        );
        assert!("daily".parse::<Style>().is_err());
    }

    #[test]
    fn level_bands() {
        assert_eq!(Level::Beginner.node_count_band(), 8..=10);
        assert_eq!(Level::Advanced.hours_band(), 4..=10);
        assert_eq!(Level::Intermediate.fallback_node_count(), 12);
    }

    #[test]
    fn run_mode_from_value() {
        assert_eq!(RunMode::from_value(None), RunMode::Production);
        assert_eq!(RunMode::from_value(Some("DEV")), RunMode::Development);
        assert_eq!(RunMode::from_value(Some("development")), RunMode::Development);
        assert_eq!(RunMode::from_value(Some("staging")), RunMode::Production);
        assert!(!RunMode::Production.allows_fallback());
    }
}
