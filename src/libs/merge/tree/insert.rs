use super::{MergeTree, Ticker, TraversalMode};
use crate::libs::merge::error::ChainError;
use crate::libs::merge::node::{ChainNode, NodeId, ROOT};
use crate::libs::merge::segment::Segment;
use crate::libs::merge::visited::VisitedSet;
use log::{debug, info};
use std::collections::BTreeSet;

/// Splice `segment` into the DAG.
///
/// Returns the id of the node holding it, `Ok(None)` if the tree is
/// interrupted (before or during this call). An interrupted insert leaves
/// the tree exactly as it was.
pub fn add_segment(tree: &mut MergeTree, segment: Segment) -> Result<Option<NodeId>, ChainError> {
    segment.validate()?;

    if let Some(&id) = tree.node_cache.get(&segment.key()) {
        return Ok(Some(id));
    }
    if tree.interrupted {
        return Ok(None);
    }

    let size = tree.size();
    let mut ticker = Ticker::new(tree.interrupt.as_deref_mut(), &mut tree.visits, size);
    let mut visited = VisitedSet::with_capacity(tree.nodes.len());

    let before = match collect_before(&tree.nodes, &segment, &mut visited, &mut ticker) {
        Some(v) => v,
        None => {
            let visits = ticker.visits();
            return Ok(interrupted(tree, visits));
        }
    };

    // ids in the two frontiers never overlap, so the marks can be shared
    let after = match tree.mode {
        TraversalMode::Iterative => {
            collect_after(&tree.nodes, &tree.leaves, &segment, &mut visited, &mut ticker)
        }
        TraversalMode::Recursive => collect_after_recursive(
            &tree.nodes,
            &tree.leaves,
            &segment,
            &mut visited,
            &mut ticker,
        ),
    };
    let after = match after {
        Some(v) => v,
        None => {
            let visits = ticker.visits();
            return Ok(interrupted(tree, visits));
        }
    };
    let visits = ticker.visits();

    let id = link(tree, segment, before, after);
    debug!(
        "inserted node {} [{}] after {} visits, {} links",
        id,
        segment.label(),
        visits,
        tree.links
    );
    debug_assert!(tree
        .nodes
        .iter()
        .all(|n| n.is_leaf() == tree.leaves.contains(&n.id)));

    Ok(Some(id))
}

/// Insert segments in order. Returns how many were taken before an interrupt.
pub fn add_segments(tree: &mut MergeTree, segments: &[Segment]) -> Result<usize, ChainError> {
    for (i, segment) in segments.iter().enumerate() {
        if tree.add_segment(*segment)?.is_none() {
            return Ok(i);
        }
    }
    Ok(segments.len())
}

fn interrupted(tree: &mut MergeTree, visits: u64) -> Option<NodeId> {
    info!(
        "merge tree interrupted during insert after {} visits ({} nodes)",
        visits,
        tree.size()
    );
    tree.interrupted = true;
    None
}

fn precedes(node: &ChainNode, segment: &Segment) -> bool {
    match &node.segment {
        Some(s) => s.precedes(segment),
        None => true,
    }
}

fn follows(node: &ChainNode, segment: &Segment) -> bool {
    match &node.segment {
        Some(s) => segment.precedes(s),
        None => false,
    }
}

/// Maximal nodes preceding `segment`, walking down from the root.
///
/// A node that does not precede `segment` cannot have a descendant that
/// does, so such branches are pruned. The result is `[ROOT]` when nothing
/// precedes `segment`.
fn collect_before(
    nodes: &[ChainNode],
    segment: &Segment,
    visited: &mut VisitedSet,
    ticker: &mut Ticker,
) -> Option<Vec<NodeId>> {
    let mut frontier = Vec::new();
    let mut stack = vec![ROOT];
    visited.mark(ROOT);

    while let Some(id) = stack.pop() {
        if ticker.tick() {
            return None;
        }
        let mut extended = false;
        for &child in &nodes[id].children {
            if precedes(&nodes[child], segment) {
                extended = true;
                if visited.mark(child) {
                    stack.push(child);
                }
            }
        }
        if !extended {
            frontier.push(id);
        }
    }

    frontier.sort_unstable();
    Some(frontier)
}

/// Leaves that `segment` precedes; every upward walk starts from them.
fn starting_leaves(
    nodes: &[ChainNode],
    leaves: &BTreeSet<NodeId>,
    segment: &Segment,
) -> Vec<NodeId> {
    leaves
        .iter()
        .copied()
        .filter(|&id| follows(&nodes[id], segment))
        .collect()
}

/// Minimal nodes that `segment` precedes, walking up from the leaves.
fn collect_after(
    nodes: &[ChainNode],
    leaves: &BTreeSet<NodeId>,
    segment: &Segment,
    visited: &mut VisitedSet,
    ticker: &mut Ticker,
) -> Option<Vec<NodeId>> {
    let mut frontier = Vec::new();
    let mut stack = Vec::new();
    for id in starting_leaves(nodes, leaves, segment) {
        if visited.mark(id) {
            stack.push(id);
        }
    }

    while let Some(id) = stack.pop() {
        if ticker.tick() {
            return None;
        }
        let mut extended = false;
        for &parent in &nodes[id].parents {
            if follows(&nodes[parent], segment) {
                extended = true;
                if visited.mark(parent) {
                    stack.push(parent);
                }
            }
        }
        if !extended {
            frontier.push(id);
        }
    }

    frontier.sort_unstable();
    Some(frontier)
}

fn collect_after_recursive(
    nodes: &[ChainNode],
    leaves: &BTreeSet<NodeId>,
    segment: &Segment,
    visited: &mut VisitedSet,
    ticker: &mut Ticker,
) -> Option<Vec<NodeId>> {
    fn helper(
        nodes: &[ChainNode],
        id: NodeId,
        segment: &Segment,
        visited: &mut VisitedSet,
        ticker: &mut Ticker,
        frontier: &mut Vec<NodeId>,
    ) -> bool {
        if ticker.tick() {
            return false;
        }
        let mut extended = false;
        for &parent in &nodes[id].parents {
            if follows(&nodes[parent], segment) {
                extended = true;
                if visited.mark(parent)
                    && !helper(nodes, parent, segment, visited, ticker, frontier)
                {
                    return false;
                }
            }
        }
        if !extended {
            frontier.push(id);
        }
        true
    }

    let mut frontier = Vec::new();
    for id in starting_leaves(nodes, leaves, segment) {
        if visited.mark(id) && !helper(nodes, id, segment, visited, ticker, &mut frontier) {
            return None;
        }
    }

    frontier.sort_unstable();
    Some(frontier)
}

/// Allocate the node and rewire edges between the two frontiers.
fn link(tree: &mut MergeTree, segment: Segment, before: Vec<NodeId>, after: Vec<NodeId>) -> NodeId {
    let id = tree.nodes.len();
    let self_score = tree.scoring.self_score(&segment);
    tree.nodes.push(ChainNode::new(id, segment, self_score));
    tree.node_cache.insert(segment.key(), id);

    // P -> S is implied by P -> new -> S from now on
    for &p in &before {
        for &s in &after {
            if let Some(pos) = tree.nodes[p].children.iter().position(|&c| c == s) {
                tree.nodes[p].children.remove(pos);
                tree.nodes[s].parents.retain(|&x| x != p);
                tree.links -= 1;
            }
        }
    }

    for &p in &before {
        tree.nodes[p].children.push(id);
        tree.leaves.remove(&p);
        tree.links += 1;
    }
    for &s in &after {
        tree.nodes[s].parents.push(id);
        tree.links += 1;
    }
    if after.is_empty() {
        tree.leaves.insert(id);
    }

    invalidate_ancestors(&mut tree.nodes, &before);

    tree.nodes[id].parents = before;
    tree.nodes[id].children = after;

    id
}

/// Clear memoized search results upstream of a new node.
///
/// A scored node always has every descendant scored, so an unscored node
/// has no scored ancestors and the walk can stop there.
fn invalidate_ancestors(nodes: &mut [ChainNode], start: &[NodeId]) {
    let mut stack: Vec<NodeId> = start.to_vec();
    while let Some(id) = stack.pop() {
        if nodes[id].chain_score.is_none() {
            continue;
        }
        nodes[id].invalidate();
        stack.extend(nodes[id].parents.iter().copied());
    }
}
