use std::collections::HashMap;

use crate::core::module::{GraphNode, ModuleId, TreeNode};
use crate::error::{ModtreeError, Result};
use crate::graph::tree::WeightPolicy;

pub mod parse;
pub mod tree;
pub mod viz;

#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    /// Overrides the first head in the input.
    pub root: Option<ModuleId>,
    pub weight: WeightPolicy,
    /// Reassemble parent/child nesting instead of returning flat tiles.
    pub nested: bool,
}

#[derive(Debug)]
pub struct Treemap {
    pub root: ModuleId,
    pub tiles: Vec<TreeNode>,
}

/// Raw edge list to treemap tiles: parse, build, materialize.
pub fn build_treemap(input: &[u8], options: &TreeOptions) -> Result<Treemap> {
    let parsed = parse::parse_edges(input)?;
    let root = match options.root.clone().or(parsed.root) {
        Some(root) => root,
        None => return Err(ModtreeError::EmptyGraph),
    };
    if !parsed.graph.contains(&root) {
        return Err(ModtreeError::MissingRoot(root.to_string()));
    }
    let tiles = tree::materialize(&parsed.graph, &root, options.weight)?;
    let tiles = if options.nested {
        viz::nest(tiles)
    } else {
        tiles
    };
    Ok(Treemap { root, tiles })
}

/// Adjacency map from module identity to its node record. Append-only:
/// nodes and edges are added, never removed.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    pub nodes: HashMap<ModuleId, GraphNode>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ModuleId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.outgoing.len()).sum()
    }

    /// Records that `head` depends on `tail`. Repeating an edge is a no-op.
    pub fn add_edge(&mut self, head: ModuleId, tail: ModuleId) {
        if !self.nodes.contains_key(&tail) {
            self.nodes
                .insert(tail.clone(), GraphNode::new(tail.clone()));
        }
        let head_node = self
            .nodes
            .entry(head.clone())
            .or_insert_with(|| GraphNode::new(head));
        if !head_node.outgoing.iter().any(|existing| existing == &tail) {
            head_node.outgoing.push(tail);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::core::module::ModuleId;
    use crate::error::ModtreeError;
    use crate::graph::tree::WeightPolicy;
    use crate::graph::{build_treemap, ModuleGraph, TreeOptions};

    const CHAIN: &[u8] = b"m/root m/a\nm/a m/b\nm/b m/c\n";

    #[test]
    fn build_treemap_uses_first_head_as_root() {
        let treemap = build_treemap(CHAIN, &TreeOptions::default()).expect("build treemap");
        assert_eq!(treemap.root, id("m/root"));
        let paths: Vec<&str> = treemap.tiles.iter().map(|t| t.path.as_str()).collect();
        assert_eq!(paths, vec!["m/a", "m/b", "m/c"]);
    }

    #[test]
    fn build_treemap_honors_root_override_and_nesting() {
        let options = TreeOptions {
            root: Some(id("m/a")),
            weight: WeightPolicy::FanOut,
            nested: true,
        };
        let treemap = build_treemap(CHAIN, &options).expect("build treemap");
        assert_eq!(treemap.tiles.len(), 1);
        assert_eq!(treemap.tiles[0].path, id("m/b"));
        assert_eq!(treemap.tiles[0].children[0].path, id("m/c"));
    }

    #[test]
    fn build_treemap_rejects_empty_input() {
        let err = build_treemap(b"std std2\n", &TreeOptions::default()).expect_err("empty graph");
        assert!(matches!(err, ModtreeError::EmptyGraph));
    }

    #[test]
    fn build_treemap_rejects_unknown_root() {
        let options = TreeOptions {
            root: Some(id("m/missing")),
            ..TreeOptions::default()
        };
        let err = build_treemap(CHAIN, &options).expect_err("unknown root");
        assert!(matches!(err, ModtreeError::MissingRoot(_)));
    }

    fn id(name: &str) -> ModuleId {
        ModuleId::new(name)
    }

    #[test]
    fn add_edge_creates_both_endpoints() {
        let mut graph = ModuleGraph::new();
        graph.add_edge(id("example.com/app"), id("example.com/core"));

        assert_eq!(graph.len(), 2);
        let app = graph.get(&id("example.com/app")).expect("app node");
        assert_eq!(app.outgoing, vec![id("example.com/core")]);
        assert_eq!(app.weight, 1);
        let core = graph.get(&id("example.com/core")).expect("core node");
        assert!(core.outgoing.is_empty());
        assert_eq!(core.weight, 1);
    }

    #[test]
    fn repeated_edges_are_stored_once_in_first_seen_order() {
        let mut graph = ModuleGraph::new();
        graph.add_edge(id("m/app"), id("m/b"));
        graph.add_edge(id("m/app"), id("m/a"));
        graph.add_edge(id("m/app"), id("m/b"));
        graph.add_edge(id("m/app"), id("m/a"));

        let app = graph.get(&id("m/app")).expect("app node");
        assert_eq!(app.outgoing, vec![id("m/b"), id("m/a")]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn no_node_has_duplicate_outgoing_edges() {
        let mut graph = ModuleGraph::new();
        let pairs = [
            ("m/a", "m/b"),
            ("m/a", "m/c"),
            ("m/b", "m/c"),
            ("m/a", "m/b"),
            ("m/c", "m/a"),
            ("m/b", "m/c"),
        ];
        for (head, tail) in pairs {
            graph.add_edge(id(head), id(tail));
        }
        for node in graph.nodes.values() {
            let unique: HashSet<_> = node.outgoing.iter().collect();
            assert_eq!(unique.len(), node.outgoing.len(), "{}", node.identity);
        }
    }

    #[test]
    fn self_edge_is_kept() {
        let mut graph = ModuleGraph::new();
        graph.add_edge(id("m/a"), id("m/a"));
        assert_eq!(graph.len(), 1);
        assert_eq!(
            graph.get(&id("m/a")).expect("node").outgoing,
            vec![id("m/a")]
        );
    }
}
