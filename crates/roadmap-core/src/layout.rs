//! Deterministic tree layout
//!
//! Places the node at array index `i` as if the list were an implicit
//! binary heap: level `floor(log2(i + 1))`, spread evenly across a level
//! width that doubles with depth. Nodes in the right half of a level are
//! pushed right and the left half pushed left by a padding that grows
//! `1.5x` per level, separating the two subtrees.

use crate::types::{Position, RoadmapNode};

/// Horizontal space budget per node at the deepest level
pub const MIN_NODE_SPACING: f64 = 140.0;

/// Distance between levels
pub const VERTICAL_SPACING: f64 = 100.0;

/// Y coordinate of the root
pub const TOP_MARGIN: f64 = 50.0;

/// Base left/right subtree separation
pub const LEVEL_PADDING: f64 = 20.0;

/// Coordinate of `index` in a roadmap of `total` nodes
///
/// Pure: equal inputs always give equal outputs. An `index` outside
/// `[0, total)` is laid out as the only node of its level.
#[must_use]
pub fn position(index: usize, total: usize) -> Position {
    let level = index.saturating_add(1).ilog2();
    let level_width = 1usize << level;
    let level_start = level_width - 1;
    let position_in_level = index - level_start;
    let nodes_in_level = level_width
        .min(total.saturating_sub(level_start))
        .max(1);

    let base_width = MIN_NODE_SPACING * level_width as f64;
    let mut x = (position_in_level + 1) as f64 * base_width / (nodes_in_level + 1) as f64
        - base_width / 2.0;

    if level > 0 {
        let padding = LEVEL_PADDING * 1.5_f64.powi(level as i32);
        if position_in_level as f64 >= nodes_in_level as f64 / 2.0 {
            x += padding;
        } else {
            x -= padding;
        }
    }

    Position {
        x,
        y: f64::from(level) * VERTICAL_SPACING + TOP_MARGIN,
    }
}

/// Recompute every node's position from its index
pub fn apply(nodes: &mut [RoadmapNode]) {
    let total = nodes.len();
    for (index, node) in nodes.iter_mut().enumerate() {
        node.position = position(index, total);
    }
}
