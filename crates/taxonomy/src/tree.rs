//! Pure operations over the category forest.
//!
//! Every mutator borrows the input and returns a fresh `Vec`; nothing here
//! changes a tree in place. Recursive walks stop at [`MAX_DEPTH`].

use crate::error::{Result, TaxonomyError};
use crate::types::{CategoryId, CategoryNode, MAX_DEPTH};

/// Flip `expanded` on the node with `target` id. All other flags are kept.
pub fn toggle_expanded(tree: &[CategoryNode], target: &CategoryId) -> Vec<CategoryNode> {
    toggle_nodes(tree, target, 0)
}

fn toggle_nodes(nodes: &[CategoryNode], target: &CategoryId, depth: usize) -> Vec<CategoryNode> {
    nodes
        .iter()
        .map(|node| {
            let children = if depth < MAX_DEPTH {
                toggle_nodes(&node.children, target, depth + 1)
            } else {
                node.children.clone()
            };
            CategoryNode {
                id: node.id.clone(),
                label: node.label.clone(),
                expanded: if node.id == *target {
                    !node.expanded
                } else {
                    node.expanded
                },
                children,
            }
        })
        .collect()
}

/// Prune the forest to nodes whose label contains `term`, case-insensitively.
///
/// A node whose own label matches keeps its full original subtree. A node kept
/// only for a matching descendant gets the pruned children and is expanded so
/// the match is visible. A blank term returns an unchanged copy.
pub fn filter_by_search(tree: &[CategoryNode], term: &str) -> Vec<CategoryNode> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return tree.to_vec();
    }
    filter_nodes(tree, &needle, 0)
}

fn filter_nodes(nodes: &[CategoryNode], needle: &str, depth: usize) -> Vec<CategoryNode> {
    nodes
        .iter()
        .filter_map(|node| prune(node, needle, depth))
        .collect()
}

fn prune(node: &CategoryNode, needle: &str, depth: usize) -> Option<CategoryNode> {
    if node.label.to_lowercase().contains(needle) {
        return Some(node.clone());
    }
    if depth >= MAX_DEPTH {
        return None;
    }
    let kept = filter_nodes(&node.children, needle, depth + 1);
    if kept.is_empty() {
        return None;
    }
    Some(CategoryNode {
        id: node.id.clone(),
        label: node.label.clone(),
        children: kept,
        expanded: true,
    })
}

/// Depth-first lookup by id
pub fn find_node<'a>(tree: &'a [CategoryNode], id: &CategoryId) -> Option<&'a CategoryNode> {
    find_where(tree, 0, &|node| node.id == *id)
}

/// Label of the first node with `id`, depth-first
pub fn find_label<'a>(tree: &'a [CategoryNode], id: &CategoryId) -> Option<&'a str> {
    find_node(tree, id).map(|node| node.label.as_str())
}

/// First node whose label equals `label` ignoring case and surrounding spaces
pub fn find_by_label<'a>(tree: &'a [CategoryNode], label: &str) -> Option<&'a CategoryNode> {
    let wanted = label.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    find_where(tree, 0, &|node| node.label.trim().to_lowercase() == wanted)
}

/// First node satisfying `predicate`, depth-first
pub fn find_first<'a>(
    tree: &'a [CategoryNode],
    predicate: impl Fn(&CategoryNode) -> bool,
) -> Option<&'a CategoryNode> {
    find_where(tree, 0, &predicate)
}

fn find_where<'a>(
    nodes: &'a [CategoryNode],
    depth: usize,
    predicate: &dyn Fn(&CategoryNode) -> bool,
) -> Option<&'a CategoryNode> {
    for node in nodes {
        if predicate(node) {
            return Some(node);
        }
        if depth < MAX_DEPTH {
            if let Some(found) = find_where(&node.children, depth + 1, predicate) {
                return Some(found);
            }
        }
    }
    None
}

/// Root-to-node chain ending at `id`
pub fn path_to<'a>(tree: &'a [CategoryNode], id: &CategoryId) -> Option<Vec<&'a CategoryNode>> {
    let mut trail = Vec::new();
    if collect_path(tree, id, 0, &mut trail) {
        Some(trail)
    } else {
        None
    }
}

fn collect_path<'a>(
    nodes: &'a [CategoryNode],
    id: &CategoryId,
    depth: usize,
    trail: &mut Vec<&'a CategoryNode>,
) -> bool {
    for node in nodes {
        trail.push(node);
        if node.id == *id {
            return true;
        }
        if depth < MAX_DEPTH && collect_path(&node.children, id, depth + 1, trail) {
            return true;
        }
        trail.pop();
    }
    false
}

/// Append a node at the root level. Never nests under an existing parent.
pub fn append_root_leaf(tree: &[CategoryNode], node: CategoryNode) -> Vec<CategoryNode> {
    let mut next = Vec::with_capacity(tree.len() + 1);
    next.extend_from_slice(tree);
    next.push(node);
    next
}

/// Row of the flattened, expansion-aware view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeRow<'a> {
    pub depth: usize,
    pub node: &'a CategoryNode,
}

/// Rows a picker would show: children appear only under expanded nodes
pub fn visible_rows(tree: &[CategoryNode]) -> Vec<TreeRow<'_>> {
    let mut rows = Vec::new();
    push_rows(tree, 0, &mut rows);
    rows
}

fn push_rows<'a>(nodes: &'a [CategoryNode], depth: usize, rows: &mut Vec<TreeRow<'a>>) {
    for node in nodes {
        rows.push(TreeRow { depth, node });
        if node.expanded && depth < MAX_DEPTH {
            push_rows(&node.children, depth + 1, rows);
        }
    }
}

/// Visit every node with its depth, parents before children
pub fn for_each_node(tree: &[CategoryNode], visit: &mut dyn FnMut(&CategoryNode, usize)) {
    fn walk(nodes: &[CategoryNode], depth: usize, visit: &mut dyn FnMut(&CategoryNode, usize)) {
        for node in nodes {
            visit(node, depth);
            if depth < MAX_DEPTH {
                walk(&node.children, depth + 1, visit);
            }
        }
    }
    walk(tree, 0, visit);
}

pub fn node_count(tree: &[CategoryNode]) -> usize {
    let mut count = 0;
    for_each_node(tree, &mut |_, _| count += 1);
    count
}

/// Parse a forest from JSON and reject nodes the picker cannot display
pub fn parse_tree(json: &str) -> Result<Vec<CategoryNode>> {
    let tree: Vec<CategoryNode> = serde_json::from_str(json)?;
    validate_tree(&tree)?;
    Ok(tree)
}

/// Reject blank labels. Nodes below [`MAX_DEPTH`] are never shown and are not
/// inspected; depth alone is not an error.
pub fn validate_tree(tree: &[CategoryNode]) -> Result<()> {
    let mut blank = None;
    for_each_node(tree, &mut |node, _| {
        if blank.is_none() && node.label.trim().is_empty() {
            blank = Some(node.id.clone());
        }
    });
    match blank {
        Some(id) => Err(TaxonomyError::EmptyLabel(id)),
        None => Ok(()),
    }
}
