pub mod check;
pub mod insert;
pub mod io;
pub mod search;

use super::error::ChainError;
use super::node::{ChainNode, NodeId, ROOT};
use super::scoring::ScoringConfig;
use super::segment::{Segment, SegmentKey};
use fxhash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt;

/// The interrupt callback is consulted once every this many node visits.
pub const INTERRUPT_INTERVAL: u64 = 100;

/// Snapshot handed to the interrupt callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Nodes visited by all walks over the tree so far
    pub visits: u64,
    /// Segment nodes in the tree
    pub size: usize,
}

/// Returns `true` to stop the tree.
pub type InterruptFn = dyn FnMut(&Progress) -> bool;

/// How graph walks are carried out.
///
/// `Recursive` uses the native call stack, whose depth grows with the
/// longest chain in the tree. Keep it for small inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalMode {
    #[default]
    Iterative,
    Recursive,
}

/// Advances the tree's visit counter during a single walk.
///
/// The counter outlives the walk, so many short walks still reach the
/// callback.
pub(crate) struct Ticker<'a> {
    counter: &'a mut u64,
    start: u64,
    size: usize,
    callback: Option<&'a mut InterruptFn>,
    fired: bool,
}

impl<'a> Ticker<'a> {
    pub(crate) fn new(
        callback: Option<&'a mut InterruptFn>,
        counter: &'a mut u64,
        size: usize,
    ) -> Self {
        let start = *counter;
        Self {
            counter,
            start,
            size,
            callback,
            fired: false,
        }
    }

    /// Count one visit. Returns `true` once the callback has asked to stop.
    pub(crate) fn tick(&mut self) -> bool {
        if self.fired {
            return true;
        }
        *self.counter += 1;
        if *self.counter % INTERRUPT_INTERVAL == 0 {
            let progress = Progress {
                visits: *self.counter,
                size: self.size,
            };
            if let Some(cb) = self.callback.as_deref_mut() {
                self.fired = cb(&progress);
            }
        }
        self.fired
    }

    /// Visits made by this walk
    pub(crate) fn visits(&self) -> u64 {
        *self.counter - self.start
    }

    pub(crate) fn fired(&self) -> bool {
        self.fired
    }
}

/// An incremental DAG of alignment segments ordered by "precedes".
///
/// Nodes live in an arena and refer to each other by id. Slot 0 holds the
/// synthetic root, which is an ancestor of every segment node. Edges form
/// the transitive reduction of the precedes order.
pub struct MergeTree {
    /// Arena storage for all nodes
    pub(super) nodes: Vec<ChainNode>,

    /// Nodes without children
    pub(super) leaves: BTreeSet<NodeId>,

    /// Coordinates -> node, for idempotent inserts
    pub(super) node_cache: FxHashMap<SegmentKey, NodeId>,

    pub(super) scoring: ScoringConfig,
    pub(super) mode: TraversalMode,

    pub(super) interrupt: Option<Box<InterruptFn>>,
    pub(super) interrupted: bool,
    /// Running count of node visits, never reset
    pub(super) visits: u64,

    /// Edge count
    pub(super) links: usize,
}

impl Default for MergeTree {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl fmt::Debug for MergeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeTree")
            .field("size", &self.size())
            .field("links", &self.links)
            .field("leaves", &self.leaves)
            .field("scoring", &self.scoring)
            .field("mode", &self.mode)
            .field("interrupted", &self.interrupted)
            .field("visits", &self.visits)
            .finish()
    }
}

impl MergeTree {
    /// Create a tree holding only the root.
    pub fn new(scoring: ScoringConfig) -> Self {
        let mut leaves = BTreeSet::new();
        leaves.insert(ROOT);
        Self {
            nodes: vec![ChainNode::root()],
            leaves,
            node_cache: FxHashMap::default(),
            scoring,
            mode: TraversalMode::default(),
            interrupt: None,
            interrupted: false,
            visits: 0,
            links: 0,
        }
    }

    /// Set the walk implementation (builder pattern)
    pub fn with_traversal(mut self, mode: TraversalMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn traversal(&self) -> TraversalMode {
        self.mode
    }

    // --- Introspection ---

    /// No segment was ever added
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Segment nodes, root excluded
    pub fn size(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Edges, root edges included
    pub fn links(&self) -> usize {
        self.links
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn leaves(&self) -> &BTreeSet<NodeId> {
        &self.leaves
    }

    pub fn node(&self, id: NodeId) -> Option<&ChainNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &ChainNode> {
        self.nodes.iter()
    }

    /// Node holding these coordinates, if inserted
    pub fn find(&self, segment: &Segment) -> Option<NodeId> {
        self.node_cache.get(&segment.key()).copied()
    }

    pub fn self_score(&self, segment: &Segment) -> i64 {
        self.scoring.self_score(segment)
    }

    pub fn gap_penalty(&self, early: &Segment, late: &Segment) -> i64 {
        self.scoring.gap_penalty(early, late)
    }

    // --- Cancellation ---

    /// Install a callback consulted every [`INTERRUPT_INTERVAL`] visits,
    /// counted across operations.
    pub fn set_interrupt_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&Progress) -> bool + 'static,
    {
        self.interrupt = Some(Box::new(callback));
    }

    pub fn clear_interrupt_callback(&mut self) {
        self.interrupt = None;
    }

    /// Node visits made by every insert and search so far.
    ///
    /// The callback sees this running total in [`Progress::visits`], so a
    /// budget for the next operation is `tree.visits() + n`.
    pub fn visits(&self) -> u64 {
        self.visits
    }

    /// Sticky once a callback returned `true`.
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }

    /// Allow walks again after an interrupt.
    pub fn reset_interrupted(&mut self) {
        self.interrupted = false;
    }

    // --- Delegation to insert ---

    pub fn add_segment(&mut self, segment: Segment) -> Result<Option<NodeId>, ChainError> {
        insert::add_segment(self, segment)
    }

    pub fn add_segments(&mut self, segments: &[Segment]) -> Result<usize, ChainError> {
        insert::add_segments(self, segments)
    }

    // --- Delegation to search ---

    pub fn search(&mut self, once: bool) -> Vec<Segment> {
        search::search(self, once)
    }

    pub fn best_score(&self) -> Option<i64> {
        search::best_score(self)
    }

    pub fn score(&self, chain: &[Segment]) -> Result<i64, ChainError> {
        search::score(&self.scoring, chain)
    }

    // --- Delegation to check ---

    pub fn check_invariants(&self) -> Result<(), String> {
        check::check_invariants(self)
    }

    // --- Delegation to io ---

    pub fn to_text(&self) -> String {
        io::to_text(self)
    }

    pub fn to_dot(&self) -> String {
        io::to_dot(self)
    }
}
