//! Response repair
//!
//! Turns untrusted service text into a well-formed node list:
//!
//! ```text
//! raw text ─► JSON value ─► `nodes` array ─► per-element repair ─► sort ─► renumber
//!            (direct, then                  (defaults, coercion,         ─► acyclic children
//!             brace-span fallback)           safe node on failure)       ─► layout
//! ```
//!
//! Only two failures escape: no JSON object at all (`Parse`) and no
//! non-empty `nodes` array (`Format`). Everything wrong inside an element
//! is corrected in place.

use crate::error::RoadmapError;
use crate::graph;
use crate::layout;
use crate::types::RoadmapNode;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashSet;

/// Description used when the service sent none
pub const DESCRIPTION_PLACEHOLDER: &str = "No description available yet.";

/// Hours assigned to a substituted node
pub const SAFE_NODE_HOURS: f64 = 1.0;

// Best-effort: first `{` to last `}`. Fooled by unrelated braces in the
// surrounding prose and by truncated output.
static OBJECT_SPAN: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"(?s)\{.*\}").expect("object span pattern is valid"));

static SEQUENCE_PREFIX: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"^\s*\d+\.(?:\s+|$)").expect("sequence prefix pattern is valid"));

/// Result of a repair pass
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    /// Repaired nodes, sorted and numbered `1..=N`
    pub nodes: Vec<RoadmapNode>,
    /// Raw element indices replaced by a safe node
    pub substituted: Vec<usize>,
    /// Child references removed (dangling, duplicate, self or cyclic)
    pub dropped_children: usize,
}

/// Repair raw service text into nodes
///
/// # Errors
/// `RoadmapError::Parse` when no JSON object can be recovered,
/// `RoadmapError::Format` when it has no non-empty `nodes` array.
pub fn repair(raw: &str) -> Result<Vec<RoadmapNode>, RoadmapError> {
    repair_with_report(raw).map(|outcome| outcome.nodes)
}

/// Repair raw service text and report what was corrected
///
/// # Errors
/// See [`repair`].
pub fn repair_with_report(raw: &str) -> Result<RepairOutcome, RoadmapError> {
    let value = extract_json(raw)?;
    let elements = node_elements(&value)?;
    let total = elements.len();
    let ids = assign_ids(elements);
    let known: HashSet<&str> = ids.iter().map(String::as_str).collect();

    let mut substituted = Vec::new();
    let mut dropped_children = 0;
    let mut keyed = Vec::with_capacity(total);

    for (index, element) in elements.iter().enumerate() {
        let key = sort_key(element, index);
        match repair_element(element, index, &ids[index], &known) {
            Ok((node, dropped)) => {
                dropped_children += dropped;
                keyed.push((key, node));
            }
            Err(reason) => {
                tracing::warn!(index, reason, "substituting safe node");
                substituted.push(index);
                keyed.push((key, safe_node(index, &ids[index])));
            }
        }
    }

    // stable: equal keys keep their raw order
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut nodes: Vec<RoadmapNode> = keyed.into_iter().map(|(_, node)| node).collect();
    renumber(&mut nodes);
    dropped_children += graph::drop_back_edges(&mut nodes);
    layout::apply(&mut nodes);

    Ok(RepairOutcome {
        nodes,
        substituted,
        dropped_children,
    })
}

/// Recover a JSON value from raw text
///
/// # Errors
/// `RoadmapError::Parse` when neither the whole text nor its brace span parses.
pub fn extract_json(raw: &str) -> Result<Value, RoadmapError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
        return Ok(value);
    }

    let span = OBJECT_SPAN
        .find(raw)
        .ok_or_else(|| RoadmapError::Parse("no JSON object found in response".to_string()))?;
    serde_json::from_str(span.as_str())
        .map_err(|e| RoadmapError::Parse(format!("embedded JSON object is invalid: {e}")))
}

fn node_elements(value: &Value) -> Result<&Vec<Value>, RoadmapError> {
    let nodes = value
        .get("nodes")
        .ok_or_else(|| RoadmapError::Format("response has no `nodes` key".to_string()))?
        .as_array()
        .ok_or_else(|| RoadmapError::Format("`nodes` is not an array".to_string()))?;
    if nodes.is_empty() {
        return Err(RoadmapError::Format("`nodes` array is empty".to_string()));
    }
    Ok(nodes)
}

/// Effective id per element: the raw id on first occurrence, otherwise
/// the smallest free `node_<k>` (starting from the element's own ordinal).
fn assign_ids(elements: &[Value]) -> Vec<String> {
    let raw: Vec<Option<&str>> = elements.iter().map(raw_id).collect();

    let mut taken: HashSet<String> = HashSet::new();
    let mut first_owner: Vec<bool> = Vec::with_capacity(raw.len());
    for id in &raw {
        first_owner.push(id.is_some_and(|id| taken.insert(id.to_string())));
    }

    raw.iter()
        .zip(first_owner)
        .enumerate()
        .map(|(index, (id, owner))| match id {
            Some(id) if owner => (*id).to_string(),
            _ => {
                let mut ordinal = index + 1;
                loop {
                    let candidate = RoadmapNode::id_for(ordinal);
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                    ordinal += 1;
                }
            }
        })
        .collect()
}

fn raw_id(element: &Value) -> Option<&str> {
    element
        .get("id")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

fn repair_element(
    element: &Value,
    index: usize,
    id: &str,
    known: &HashSet<&str>,
) -> Result<(RoadmapNode, usize), &'static str> {
    let obj = element.as_object().ok_or("element is not an object")?;
    let ordinal = index + 1;

    let sequence = ordinal as u32;
    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| format!("{ordinal}. Untitled Node"), str::to_string);
    let title = if has_sequence_prefix(&title) {
        title
    } else {
        format!("{sequence}. {title}")
    };

    let mut description = string_items(obj.get("description"));
    if description.is_empty() {
        description.push(DESCRIPTION_PLACEHOLDER.to_string());
    }

    let mut dropped = 0;
    let mut seen = HashSet::new();
    let mut children = Vec::new();
    for child in string_items(obj.get("children")) {
        if child != id && known.contains(child.as_str()) && seen.insert(child.clone()) {
            children.push(child);
        } else {
            dropped += 1;
        }
    }

    let time_needed = obj
        .get("timeNeeded")
        .and_then(Value::as_f64)
        .filter(|h| *h >= 0.0)
        .unwrap_or(0.0);

    let mut node = RoadmapNode::new(id, title, sequence).with_time_needed(time_needed);
    node.description = description;
    node.children = children;
    node.deadline = obj
        .get("deadline")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok((node, dropped))
}

/// Ordering key: any numeric `sequence` as sent, else the element's ordinal
fn sort_key(element: &Value, index: usize) -> f64 {
    element
        .get("sequence")
        .and_then(Value::as_f64)
        .filter(|key| key.is_finite())
        .unwrap_or((index + 1) as f64)
}

fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn safe_node(index: usize, id: &str) -> RoadmapNode {
    let ordinal = index + 1;
    RoadmapNode::new(id, format!("{ordinal}. Learning Step {ordinal}"), ordinal as u32)
        .with_description([DESCRIPTION_PLACEHOLDER])
        .with_time_needed(SAFE_NODE_HOURS)
}

/// Whether `title` starts with `"<int>."`
#[must_use]
pub fn has_sequence_prefix(title: &str) -> bool {
    SEQUENCE_PREFIX.is_match(title)
}

/// Replace or add the `"<sequence>. "` prefix
#[must_use]
pub fn renumber_title(title: &str, sequence: u32) -> String {
    let rest = SEQUENCE_PREFIX.replace(title, "");
    format!("{sequence}. {}", rest.trim())
}

/// Re-stamp sequences to list positions `1..=N` and fix title prefixes
pub fn renumber(nodes: &mut [RoadmapNode]) {
    for (index, node) in nodes.iter_mut().enumerate() {
        let sequence = index as u32 + 1;
        node.sequence = sequence;
        node.title = renumber_title(&node.title, sequence);
    }
}
