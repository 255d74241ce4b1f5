use std::fmt;

use serde::Serialize;

/// Qualified module name, e.g. `github.com/spf13/cobra`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Adjacency-map entry. `outgoing` holds the modules this one depends on,
/// unique by identity, in first-seen order.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub identity: ModuleId,
    pub weight: u64,
    pub outgoing: Vec<ModuleId>,
}

impl GraphNode {
    pub fn new(identity: ModuleId) -> Self {
        Self {
            identity,
            weight: 1,
            outgoing: Vec::new(),
        }
    }

    pub fn fan_out(&self) -> u64 {
        self.outgoing.len() as u64
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }
}

/// A materialized treemap tile. Field names on the wire follow what chart
/// libraries expect: `name`, `value`, `path`, `children`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    #[serde(rename = "name", skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    #[serde(rename = "value")]
    pub weight: u64,
    pub path: ModuleId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    /// Module whose expansion discovered this node; `None` for the root's
    /// direct dependencies.
    #[serde(skip)]
    pub parent: Option<ModuleId>,
}

impl TreeNode {
    pub fn seed(path: ModuleId, weight: u64, parent: Option<ModuleId>) -> Self {
        Self {
            display_name: String::new(),
            weight,
            path,
            children: Vec::new(),
            parent,
        }
    }
}
