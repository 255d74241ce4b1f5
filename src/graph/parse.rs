//! Parser for `go mod graph` style edge lists.
//!
//! Each record is `<head> <tail>`, meaning `head` depends on `tail`. Tokens
//! may carry a version suffix (`example.com/core@v1.2.3`), which is dropped.
//! Records where either side has no `/` (the main module without a path,
//! `go@1.22`, `toolchain@go1.22.1`, standard library names) are skipped.

use tracing::debug;

use crate::core::module::ModuleId;
use crate::error::{ModtreeError, Result};
use crate::graph::ModuleGraph;

pub const VERSION_SEPARATOR: char = '@';
pub const PATH_SEPARATOR: char = '/';

#[derive(Debug, Default)]
pub struct ParsedGraph {
    pub graph: ModuleGraph,
    /// Head of the first accepted record.
    pub root: Option<ModuleId>,
    pub accepted: usize,
    pub skipped: usize,
}

/// Parses the whole buffer into an adjacency map. Any record without two
/// tokens aborts the parse, blank lines included.
pub fn parse_edges(input: &[u8]) -> Result<ParsedGraph> {
    let text = String::from_utf8_lossy(input);
    let mut parsed = ParsedGraph::default();

    for (idx, line) in text.lines().enumerate() {
        match parse_record(idx + 1, line)? {
            Some((head, tail)) => {
                if parsed.root.is_none() {
                    parsed.root = Some(head.clone());
                }
                parsed.graph.add_edge(head, tail);
                parsed.accepted += 1;
            }
            None => parsed.skipped += 1,
        }
    }

    debug!(
        accepted = parsed.accepted,
        skipped = parsed.skipped,
        modules = parsed.graph.len(),
        edges = parsed.graph.edge_count(),
        "parsed edge list"
    );
    Ok(parsed)
}

/// Returns `Ok(None)` when the record is well formed but filtered out.
pub fn parse_record(line_no: usize, line: &str) -> Result<Option<(ModuleId, ModuleId)>> {
    let mut parts = line.split_whitespace();
    let (head, tail) = match (parts.next(), parts.next()) {
        (Some(head), Some(tail)) => (head, tail),
        _ => {
            return Err(ModtreeError::MalformedRecord {
                line: line_no,
                record: line.to_string(),
            })
        }
    };

    let head = strip_version(head);
    let tail = strip_version(tail);
    if !is_hierarchical(head) || !is_hierarchical(tail) {
        return Ok(None);
    }
    Ok(Some((ModuleId::new(head), ModuleId::new(tail))))
}

pub fn strip_version(token: &str) -> &str {
    token
        .split_once(VERSION_SEPARATOR)
        .map_or(token, |(name, _)| name)
}

fn is_hierarchical(name: &str) -> bool {
    name.contains(PATH_SEPARATOR)
}
