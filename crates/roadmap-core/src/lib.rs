//! Roadmap Core
//!
//! Turns a learning topic into an ordered, laid-out tree of roadmap nodes:
//! - Validates the topic prompt before any external call
//! - Prompts the generation service for a JSON node list
//! - Repairs the untrusted response into well-formed nodes
//! - Places every node with a deterministic tree layout
//! - Applies progress edits to a generated roadmap
//!
//! # Example
//!
//! ```rust,ignore
//! use roadmap_core::{GeneratorConfig, Level, RoadmapGenerator, Style};
//! use roadmap_llm::OpenAiClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(OpenAiClient::from_env()?);
//! let generator = RoadmapGenerator::new(client, GeneratorConfig::new());
//!
//! let nodes = generator.generate("Python", Level::Beginner, Style::WeekByWeek).await?;
//! println!("{} steps", nodes.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod graph;
pub mod layout;
pub mod prompt;
pub mod repair;
pub mod roadmap;
pub mod types;
pub mod validation;

pub use config::GeneratorConfig;
pub use error::{ConfigError, PromptRejection, RoadmapError, UnknownVariant};
pub use fallback::fallback_roadmap;
pub use generator::RoadmapGenerator;
pub use layout::position;
pub use repair::{repair, repair_with_report, RepairOutcome};
pub use roadmap::{Progress, Roadmap};
pub use types::{Level, Position, RoadmapNode, RunMode, Style};
pub use validation::validate_prompt;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with roadmap core
    pub use crate::{
        GeneratorConfig, Level, Position, Roadmap, RoadmapError, RoadmapGenerator, RoadmapNode,
        RunMode, Style,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
