//! Unrolls the module graph into treemap tiles.
//!
//! The dependency graph may contain diamonds and cycles, a treemap needs a
//! tree. The traversal is a breadth-first walk from the root with a visited
//! set: every module is materialized at most once and is attached to
//! whichever module discovered it first. Edges into already visited modules
//! are not followed, which is what makes cycles terminate.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::module::{ModuleId, TreeNode};
use crate::error::{ModtreeError, Result};
use crate::graph::parse::PATH_SEPARATOR;
use crate::graph::ModuleGraph;

/// How a tile's weight is aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightPolicy {
    /// `1 + number of direct dependencies`.
    #[default]
    FanOut,
    /// Like `FanOut`, but an already visited dependency that itself has
    /// dependencies adds its fan-out to the module that points at it again.
    Legacy,
}

impl FromStr for WeightPolicy {
    type Err = ModtreeError;

    fn from_str(input: &str) -> Result<Self> {
        match input.to_ascii_lowercase().as_str() {
            "fan-out" | "fanout" => Ok(Self::FanOut),
            "legacy" => Ok(Self::Legacy),
            _ => Err(ModtreeError::Other(anyhow::anyhow!(
                "unknown weight policy '{}' (expected 'fan-out' or 'legacy')",
                input
            ))),
        }
    }
}

impl fmt::Display for WeightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FanOut => f.write_str("fan-out"),
            Self::Legacy => f.write_str("legacy"),
        }
    }
}

/// Short label for a qualified name: the last path segment, or the one
/// before it when the last is two characters or fewer (`v2`, `go`, ``).
pub fn short_name(name: &str) -> String {
    let (prefix, last) = match name.rfind(PATH_SEPARATOR) {
        Some(idx) => (&name[..idx + 1], &name[idx + 1..]),
        None => ("", name),
    };
    if last.len() > 2 {
        return last.to_string();
    }
    let trimmed = prefix.trim_end_matches(PATH_SEPARATOR);
    match trimmed.rsplit(PATH_SEPARATOR).next() {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => last.to_string(),
    }
}

/// Produces one tile per module reachable from `root` (the root itself is
/// only included when a cycle leads back to it). The result is flat; each
/// tile carries a `parent` back-reference for callers that want nesting.
/// Tiles are returned sorted by path.
pub fn materialize(
    graph: &ModuleGraph,
    root: &ModuleId,
    policy: WeightPolicy,
) -> Result<Vec<TreeNode>> {
    let root_node = graph
        .get(root)
        .ok_or_else(|| ModtreeError::MissingRoot(root.to_string()))?;

    let mut seen: HashSet<ModuleId> = HashSet::new();
    let mut materialized: HashMap<ModuleId, TreeNode> = HashMap::new();
    let mut queue: VecDeque<TreeNode> = VecDeque::new();

    for target in &root_node.outgoing {
        if !seen.insert(target.clone()) {
            continue;
        }
        let target_node = graph.get(target);
        let weight = target_node.map_or(1, |node| node.weight);
        let mut tile = TreeNode::seed(target.clone(), weight, None);
        if target_node.is_some_and(|node| !node.has_outgoing()) {
            tile.display_name = short_name(target.as_str());
            materialized.insert(target.clone(), tile);
            continue;
        }
        queue.push_back(tile);
    }

    while let Some(mut tile) = queue.pop_front() {
        let Some(current) = graph.get(&tile.path) else {
            trace!(module = %tile.path, "dropping module missing from graph");
            continue;
        };
        tile.display_name = short_name(tile.path.as_str());
        tile.weight += current.fan_out();

        for target in &current.outgoing {
            let target_node = graph.get(target);
            if seen.contains(target) {
                if policy == WeightPolicy::Legacy {
                    if let Some(node) = target_node.filter(|node| node.has_outgoing()) {
                        tile.weight += node.fan_out();
                    }
                }
                continue;
            }
            seen.insert(target.clone());
            let weight = target_node.map_or(1, |node| node.weight);
            queue.push_back(TreeNode::seed(
                target.clone(),
                weight,
                Some(tile.path.clone()),
            ));
        }

        materialized.insert(tile.path.clone(), tile);
    }

    let mut tiles: Vec<TreeNode> = materialized.into_values().collect();
    tiles.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(
        root = %root,
        tiles = tiles.len(),
        policy = %policy,
        "materialized module tree"
    );
    Ok(tiles)
}
