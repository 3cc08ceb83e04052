use super::{MergeTree, Ticker, TraversalMode};
use crate::libs::merge::error::ChainError;
use crate::libs::merge::node::{ChainNode, NodeId, ROOT};
use crate::libs::merge::scoring::ScoringConfig;
use crate::libs::merge::segment::Segment;
use log::{debug, info};

/// Extract the best chain.
///
/// With `once == false` every node gets its `chain_score`/`best_child`
/// memoized and the global optimum is returned. With `once == true` the walk
/// descends greedily from the root, taking the child with the best immediate
/// gain, and stops at the first leaf it reaches. A tree that already holds a
/// full search result answers both modes from the memo.
///
/// An interrupted tree does not walk at all; it returns the best chain the
/// memoized part of the DAG can supply.
pub fn search(tree: &mut MergeTree, once: bool) -> Vec<Segment> {
    if tree.interrupted || tree.nodes[ROOT].chain_score.is_some() {
        return best_chain(tree);
    }
    if once {
        return greedy_chain(tree);
    }

    let size = tree.size();
    let mut ticker = Ticker::new(tree.interrupt.as_deref_mut(), &mut tree.visits, size);
    let completed = match tree.mode {
        TraversalMode::Iterative => solve_iterative(&mut tree.nodes, &tree.scoring, &mut ticker),
        TraversalMode::Recursive => {
            solve_recursive(&mut tree.nodes, &tree.scoring, ROOT, &mut ticker)
        }
    };
    let visits = ticker.visits();

    if completed {
        debug!(
            "search scored {} nodes in {} visits, best {:?}",
            size, visits, tree.nodes[ROOT].chain_score
        );
    } else {
        info!(
            "merge tree interrupted during search after {} visits ({} nodes)",
            visits, size
        );
        tree.interrupted = true;
    }

    best_chain(tree)
}

/// Total of the last complete search, None when empty or not yet searched.
pub fn best_score(tree: &MergeTree) -> Option<i64> {
    if tree.is_empty() {
        None
    } else {
        tree.nodes[ROOT].chain_score
    }
}

/// Score an externally supplied chain.
pub fn score(scoring: &ScoringConfig, chain: &[Segment]) -> Result<i64, ChainError> {
    let mut total: i64 = 0;
    for segment in chain {
        segment.validate()?;
        total = scoring.self_score(segment).saturating_add(total);
    }
    for (i, pair) in chain.windows(2).enumerate() {
        if !pair[0].precedes(&pair[1]) {
            return Err(ChainError::UnorderedChain { index: i + 1 });
        }
        total = scoring.gap_penalty(&pair[0], &pair[1]).saturating_add(total);
    }
    Ok(total)
}

fn gap(scoring: &ScoringConfig, from: &ChainNode, to: &ChainNode) -> i64 {
    match (&from.segment, &to.segment) {
        (Some(a), Some(b)) => scoring.gap_penalty(a, b),
        _ => 0,
    }
}

/// Best continuation among the already scored children of `id`.
///
/// Equal totals go to the smallest child id.
fn best_continuation(
    nodes: &[ChainNode],
    scoring: &ScoringConfig,
    id: NodeId,
) -> Option<(i64, NodeId)> {
    let node = &nodes[id];
    let mut best: Option<(i64, NodeId)> = None;
    for &child in &node.children {
        let Some(child_score) = nodes[child].chain_score else {
            continue;
        };
        let candidate = gap(scoring, node, &nodes[child]).saturating_add(child_score);
        best = match best {
            Some((score, b)) if score > candidate || (score == candidate && b < child) => best,
            _ => Some((candidate, child)),
        };
    }
    best
}

/// Fill `chain_score`/`best_child` of `id`; its children must be scored.
fn evaluate(nodes: &mut [ChainNode], scoring: &ScoringConfig, id: NodeId) {
    debug_assert!(nodes[id]
        .children
        .iter()
        .all(|&c| nodes[c].chain_score.is_some()));
    let best = best_continuation(nodes, scoring, id);
    let tail = best.map_or(0, |(s, _)| s);
    let node = &mut nodes[id];
    node.chain_score = Some(node.self_score.unwrap_or(0).saturating_add(tail));
    node.best_child = best.map(|(_, c)| c);
}

/// Post-order DP with an explicit stack. Returns false when interrupted.
fn solve_iterative(nodes: &mut [ChainNode], scoring: &ScoringConfig, ticker: &mut Ticker) -> bool {
    // (node, children already pushed)
    let mut stack: Vec<(NodeId, bool)> = vec![(ROOT, false)];

    while let Some((id, expanded)) = stack.pop() {
        if nodes[id].chain_score.is_some() {
            continue;
        }
        if expanded {
            evaluate(nodes, scoring, id);
            continue;
        }
        if ticker.tick() {
            return false;
        }
        stack.push((id, true));
        for &child in nodes[id].children.iter().rev() {
            if nodes[child].chain_score.is_none() {
                stack.push((child, false));
            }
        }
    }

    true
}

fn solve_recursive(
    nodes: &mut [ChainNode],
    scoring: &ScoringConfig,
    id: NodeId,
    ticker: &mut Ticker,
) -> bool {
    if nodes[id].chain_score.is_some() {
        return true;
    }
    if ticker.tick() {
        return false;
    }
    let children = nodes[id].children.clone();
    for child in children {
        if !solve_recursive(nodes, scoring, child, ticker) {
            return false;
        }
    }
    evaluate(nodes, scoring, id);
    true
}

/// Follow `best_child` links from the root.
///
/// If the root itself was never scored, start from its best scored child:
/// a scored node's continuation is always complete.
fn best_chain(tree: &MergeTree) -> Vec<Segment> {
    let nodes = &tree.nodes;
    let mut cursor = if nodes[ROOT].chain_score.is_some() {
        nodes[ROOT].best_child
    } else {
        best_continuation(nodes, &tree.scoring, ROOT).map(|(_, c)| c)
    };

    let mut chain = Vec::new();
    while let Some(id) = cursor {
        if let Some(segment) = nodes[id].segment {
            chain.push(segment);
        }
        cursor = nodes[id].best_child;
    }
    chain
}

/// Descend from the root taking the best immediate step each time.
fn greedy_chain(tree: &mut MergeTree) -> Vec<Segment> {
    let size = tree.size();
    let mut ticker = Ticker::new(tree.interrupt.as_deref_mut(), &mut tree.visits, size);
    let nodes = &tree.nodes;
    let scoring = &tree.scoring;

    let mut chain = Vec::new();
    let mut cursor = ROOT;
    loop {
        if ticker.tick() {
            break;
        }
        let node = &nodes[cursor];
        let mut best: Option<(i64, NodeId)> = None;
        for &child in &node.children {
            let step = gap(scoring, node, &nodes[child])
                .saturating_add(nodes[child].self_score.unwrap_or(0));
            best = match best {
                Some((score, b)) if score > step || (score == step && b < child) => best,
                _ => Some((step, child)),
            };
        }
        match best {
            Some((_, child)) => {
                if let Some(segment) = nodes[child].segment {
                    chain.push(segment);
                }
                cursor = child;
            }
            None => break,
        }
    }

    if ticker.fired() {
        let visits = ticker.visits();
        info!(
            "merge tree interrupted during greedy search after {} visits",
            visits
        );
        tree.interrupted = true;
    }
    chain
}
