use super::MergeTree;
use crate::libs::merge::node::{NodeId, ROOT};
use crate::libs::merge::visited::VisitedSet;
use std::collections::VecDeque;

/// Verify the structural invariants of the DAG.
///
/// Quadratic in the number of nodes; meant for tests and debugging.
pub fn check_invariants(tree: &MergeTree) -> Result<(), String> {
    check_links(tree)?;
    check_root(tree)?;
    check_leaves(tree)?;
    check_acyclic(tree)?;
    check_reachability(tree)?;
    check_reduced(tree)?;
    Ok(())
}

fn check_links(tree: &MergeTree) -> Result<(), String> {
    let mut edges = 0;
    for node in &tree.nodes {
        for &child in &node.children {
            if child >= tree.nodes.len() {
                return Err(format!("Node {} links to unknown node {}", node.id, child));
            }
            if !tree.nodes[child].parents.contains(&node.id) {
                return Err(format!(
                    "Edge {} -> {} missing from the parent list",
                    node.id, child
                ));
            }
            edges += 1;
        }
        for &parent in &node.parents {
            if !tree.nodes[parent].children.contains(&node.id) {
                return Err(format!(
                    "Edge {} -> {} missing from the child list",
                    parent, node.id
                ));
            }
        }
    }
    if edges != tree.links {
        return Err(format!("Counted {} edges, recorded {}", edges, tree.links));
    }
    Ok(())
}

fn check_root(tree: &MergeTree) -> Result<(), String> {
    let root = &tree.nodes[ROOT];
    if !root.is_root() || !root.parents.is_empty() {
        return Err("Root must have no segment and no parents".to_string());
    }
    if let Some(node) = tree.nodes.iter().skip(1).find(|n| n.is_root()) {
        return Err(format!("Node {} has no segment", node.id));
    }
    Ok(())
}

fn check_leaves(tree: &MergeTree) -> Result<(), String> {
    for node in &tree.nodes {
        if node.is_leaf() != tree.leaves.contains(&node.id) {
            return Err(format!(
                "Node {} has {} children but leaf set says {}",
                node.id,
                node.children.len(),
                tree.leaves.contains(&node.id)
            ));
        }
    }
    Ok(())
}

/// Kahn's algorithm must order every node.
fn check_acyclic(tree: &MergeTree) -> Result<(), String> {
    let mut in_degree: Vec<usize> = tree.nodes.iter().map(|n| n.parents.len()).collect();
    let mut queue: VecDeque<NodeId> = (0..tree.nodes.len())
        .filter(|&id| in_degree[id] == 0)
        .collect();

    let mut ordered = 0;
    while let Some(id) = queue.pop_front() {
        ordered += 1;
        for &child in &tree.nodes[id].children {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    if ordered != tree.nodes.len() {
        return Err(format!(
            "Cycle detected: only {} of {} nodes can be ordered",
            ordered,
            tree.nodes.len()
        ));
    }
    Ok(())
}

fn descendants(tree: &MergeTree, start: NodeId) -> VisitedSet {
    let mut visited = VisitedSet::with_capacity(tree.nodes.len());
    let mut stack = tree.nodes[start].children.clone();
    while let Some(id) = stack.pop() {
        if visited.mark(id) {
            stack.extend(tree.nodes[id].children.iter().copied());
        }
    }
    visited
}

/// A path X -> Y exists iff X precedes Y; the root reaches everything.
fn check_reachability(tree: &MergeTree) -> Result<(), String> {
    for x in &tree.nodes {
        let reach = descendants(tree, x.id);
        for y in tree.nodes.iter().skip(1) {
            let expected = match (&x.segment, &y.segment) {
                (None, _) => true,
                (Some(a), Some(b)) => a.precedes(b),
                (Some(_), None) => false,
            };
            if reach.is_marked(y.id) != expected {
                return Err(format!(
                    "Node {} {} node {}",
                    x.id,
                    if expected {
                        "cannot reach"
                    } else {
                        "unexpectedly reaches"
                    },
                    y.id
                ));
            }
        }
        if reach.is_marked(ROOT) {
            return Err(format!("Node {} reaches the root", x.id));
        }
    }
    Ok(())
}

/// No edge P -> S may skip over a node M with P < M < S.
fn check_reduced(tree: &MergeTree) -> Result<(), String> {
    for p in &tree.nodes {
        for &s in &p.children {
            let Some(late) = tree.nodes[s].segment else {
                continue;
            };
            let skipped = tree.nodes.iter().skip(1).find(|m| {
                m.id != s
                    && m.segment.is_some_and(|mid| {
                        p.segment.map_or(true, |early| early.precedes(&mid)) && mid.precedes(&late)
                    })
            });
            if let Some(m) = skipped {
                return Err(format!(
                    "Edge {} -> {} is redundant through node {}",
                    p.id, s, m.id
                ));
            }
        }
    }
    Ok(())
}
