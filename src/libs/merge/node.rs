use super::segment::Segment;

/// NodeId is an index into the MergeTree's node vector.
pub type NodeId = usize;

/// The synthetic root always occupies slot 0.
pub const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
pub struct ChainNode {
    /// Index in the arena
    pub id: NodeId,

    /// None only for the root
    pub segment: Option<Segment>,

    /// Direct predecessors, ascending ids
    pub parents: Vec<NodeId>,

    /// Direct successors, ascending ids
    pub children: Vec<NodeId>,

    // --- Scoring ---

    /// Intrinsic score of `segment`; None for the root
    pub self_score: Option<i64>,

    /// Memoized best total of a chain starting here; None until searched
    pub chain_score: Option<i64>,

    /// Child continuing the best chain
    pub best_child: Option<NodeId>,
}

impl ChainNode {
    pub fn root() -> Self {
        Self {
            id: ROOT,
            segment: None,
            parents: Vec::new(),
            children: Vec::new(),
            self_score: None,
            chain_score: None,
            best_child: None,
        }
    }

    pub fn new(id: NodeId, segment: Segment, self_score: i64) -> Self {
        Self {
            id,
            segment: Some(segment),
            parents: Vec::new(),
            children: Vec::new(),
            self_score: Some(self_score),
            chain_score: None,
            best_child: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.segment.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Forget the memoized search result.
    pub fn invalidate(&mut self) {
        self.chain_score = None;
        self.best_child = None;
    }
}
