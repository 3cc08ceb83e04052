use super::MergeTree;
use crate::libs::merge::node::{ChainNode, NodeId, ROOT};
use crate::libs::merge::visited::VisitedSet;
use itertools::Itertools;

fn node_label(node: &ChainNode) -> String {
    match &node.segment {
        Some(segment) => segment.label(),
        None => "root".to_string(),
    }
}

fn score_label(node: &ChainNode) -> String {
    let self_score = node
        .self_score
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    let chain_score = node
        .chain_score
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    format!("self={} chain={}", self_score, chain_score)
}

/// Indented print of the DAG, depth-first from the root.
///
/// A node reachable along several paths is printed in full once; later
/// occurrences only name it.
pub fn to_text(tree: &MergeTree) -> String {
    let mut out = String::new();
    let mut seen = VisitedSet::with_capacity(tree.nodes.len());
    // (node, depth)
    let mut stack: Vec<(NodeId, usize)> = vec![(ROOT, 0)];

    while let Some((id, depth)) = stack.pop() {
        let node = &tree.nodes[id];
        let indent = "  ".repeat(depth);
        if !seen.mark(id) {
            out += &format!("{}#{} ^\n", indent, id);
            continue;
        }
        out += &format!(
            "{}#{} [{}] {}\n",
            indent,
            id,
            node_label(node),
            score_label(node)
        );
        for &child in node.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    out
}

/// Graphviz export. Edges on the memoized best chain are drawn bold.
pub fn to_dot(tree: &MergeTree) -> String {
    let mut lines = vec!["digraph mergetree {".to_string()];
    lines.push("  node [shape=box];".to_string());

    for node in &tree.nodes {
        lines.push(format!(
            "  n{} [label=\"#{} {}\\n{}\"];",
            node.id,
            node.id,
            node_label(node),
            score_label(node)
        ));
    }

    for node in &tree.nodes {
        for &child in &node.children {
            let style = if node.best_child == Some(child) {
                " [style=bold]"
            } else {
                ""
            };
            lines.push(format!("  n{} -> n{}{};", node.id, child, style));
        }
    }
    lines.push("}".to_string());

    lines.iter().join("\n") + "\n"
}
