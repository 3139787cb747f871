//! Child-edge checks
//!
//! Keeps the parent -> child relation acyclic: edges are inserted in node
//! order and an edge whose target already reaches its source is dropped.

use crate::types::RoadmapNode;
use petgraph::algo::has_path_connecting;
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;

/// Drop child references that would close a cycle
///
/// Self references and unknown ids are dropped too. Returns the number
/// of references removed.
pub fn drop_back_edges(nodes: &mut [RoadmapNode]) -> usize {
    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), i))
        .collect();

    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for i in 0..nodes.len() {
        graph.add_node(i);
    }

    let mut dropped = 0;
    for (from, node) in nodes.iter_mut().enumerate() {
        let parent = node.id.clone();
        node.children.retain(|child| {
            let Some(&to) = index.get(child) else {
                dropped += 1;
                return false;
            };
            if to == from || has_path_connecting(&graph, to, from, None) {
                tracing::debug!(parent = %parent, child = %child, "dropping back edge");
                dropped += 1;
                return false;
            }
            graph.add_edge(from, to, ());
            true
        });
    }
    dropped
}

/// Whether the child relation of `nodes` contains a cycle
#[must_use]
pub fn has_cycle(nodes: &[RoadmapNode]) -> bool {
    let index: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
    for (from, node) in nodes.iter().enumerate() {
        graph.add_node(from);
        for child in &node.children {
            if let Some(&to) = index.get(child.as_str()) {
                graph.add_edge(from, to, ());
            }
        }
    }
    petgraph::algo::is_cyclic_directed(&graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(i: usize, children: &[usize]) -> RoadmapNode {
        RoadmapNode::new(RoadmapNode::id_for(i), format!("{i}. N"), i as u32)
            .with_children(children.iter().map(|c| RoadmapNode::id_for(*c)))
    }

    #[test]
    fn keeps_tree_edges() {
        let mut nodes = vec![node(1, &[2, 3]), node(2, &[4]), node(3, &[]), node(4, &[])];
        assert_eq!(drop_back_edges(&mut nodes), 0);
        assert_eq!(nodes[0].children, vec!["node_2", "node_3"]);
        assert!(!has_cycle(&nodes));
    }

    #[test]
    fn drops_edge_closing_cycle() {
        let mut nodes = vec![node(1, &[2]), node(2, &[3]), node(3, &[1])];
        assert!(has_cycle(&nodes));

        assert_eq!(drop_back_edges(&mut nodes), 1);
        assert!(nodes[2].children.is_empty());
        assert!(!has_cycle(&nodes));
    }

    #[test]
    fn drops_self_and_unknown_references() {
        let mut nodes = vec![node(1, &[1, 2, 9]), node(2, &[])];
        assert_eq!(drop_back_edges(&mut nodes), 2);
        assert_eq!(nodes[0].children, vec!["node_2"]);
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let mut nodes = vec![node(1, &[2, 3]), node(2, &[4]), node(3, &[4]), node(4, &[])];
        assert_eq!(drop_back_edges(&mut nodes), 0);
        assert_eq!(nodes[2].children, vec!["node_4"]);
    }
}
