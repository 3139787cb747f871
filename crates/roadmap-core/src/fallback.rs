//! Development-mode placeholder roadmap
//!
//! Stands in for the generation service while it is failing, so UI work
//! is not blocked. Never used in production mode.

use crate::layout;
use crate::types::{Level, RoadmapNode};
use rand::Rng;

/// Placeholder roadmap sized by level
///
/// Node `i` links to the next two nodes (clipped at the end) and gets a
/// random whole-hour estimate in `[1, 5]`.
pub fn fallback_roadmap<R: Rng>(topic: &str, level: Level, rng: &mut R) -> Vec<RoadmapNode> {
    let total = level.fallback_node_count();
    (0..total)
        .map(|index| {
            let ordinal = index + 1;
            let children = (ordinal + 1..=ordinal + 2)
                .filter(|child| *child <= total)
                .map(RoadmapNode::id_for);

            let mut node = RoadmapNode::new(
                RoadmapNode::id_for(ordinal),
                format!("{ordinal}. {topic}: Module {ordinal}"),
                ordinal as u32,
            )
            .with_description([
                format!("Core concepts of {topic}, part {ordinal}"),
                format!("Hands-on practice for module {ordinal}"),
                "Review and self-assessment".to_string(),
            ])
            .with_children(children)
            .with_time_needed(f64::from(rng.random_range(1..=5u32)));
            node.position = layout::position(index, total);
            node
        })
        .collect()
}
