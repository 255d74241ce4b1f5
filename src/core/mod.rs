pub mod module;

pub use module::{GraphNode, ModuleId, TreeNode};
