use std::collections::{HashMap, HashSet};

use crate::core::module::{ModuleId, TreeNode};

/// Rebuilds the hierarchy from `parent` back-references. Tiles whose parent
/// is not part of the collection become top-level entries. Siblings are
/// ordered by path.
pub fn nest(tiles: Vec<TreeNode>) -> Vec<TreeNode> {
    let known: HashSet<ModuleId> = tiles.iter().map(|tile| tile.path.clone()).collect();
    let mut by_parent: HashMap<ModuleId, Vec<TreeNode>> = HashMap::new();
    let mut roots = Vec::new();
    for tile in tiles {
        match tile.parent.clone().filter(|parent| known.contains(parent)) {
            Some(parent) => by_parent.entry(parent).or_default().push(tile),
            None => roots.push(tile),
        }
    }
    roots.sort_by(|a, b| a.path.cmp(&b.path));
    roots
        .into_iter()
        .map(|tile| attach_children(tile, &mut by_parent))
        .collect()
}

fn attach_children(
    mut tile: TreeNode,
    by_parent: &mut HashMap<ModuleId, Vec<TreeNode>>,
) -> TreeNode {
    let mut children = by_parent.remove(&tile.path).unwrap_or_default();
    children.sort_by(|a, b| a.path.cmp(&b.path));
    tile.children = children
        .into_iter()
        .map(|child| attach_children(child, by_parent))
        .collect();
    tile
}

pub fn render_tree(roots: &[TreeNode]) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&label(root));
        out.push('\n');
        render_tree_children(root, "", &mut out);
    }
    out
}

/// One `path weight` line per tile, heaviest first.
pub fn render_flat(tiles: &[TreeNode]) -> String {
    let mut rows: Vec<&TreeNode> = Vec::new();
    collect_rows(tiles, &mut rows);
    rows.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.path.cmp(&b.path)));

    let width = rows
        .iter()
        .map(|tile| tile.path.as_str().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for tile in rows {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            tile.path.as_str(),
            tile.weight,
            width = width
        ));
    }
    out
}

fn collect_rows<'a>(tiles: &'a [TreeNode], rows: &mut Vec<&'a TreeNode>) {
    for tile in tiles {
        rows.push(tile);
        collect_rows(&tile.children, rows);
    }
}

fn render_tree_children(node: &TreeNode, prefix: &str, out: &mut String) {
    for (idx, child) in node.children.iter().enumerate() {
        let is_last = idx + 1 == node.children.len();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(&label(child));
        out.push('\n');
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_tree_children(child, &next_prefix, out);
    }
}

fn label(tile: &TreeNode) -> String {
    format!("{} ({}) [{}]", tile.display_name, tile.path, tile.weight)
}
