//! Merging local alignment segments into one composite alignment.
//!
//! Segments (gap-free blocks pairing a query and a subject interval) arrive
//! one at a time and are spliced into a DAG whose edges follow the
//! "precedes" order. A memoized depth-first pass over that DAG then picks
//! the highest scoring root-to-leaf chain.
//!
//! # Core Components
//!
//! * [`segment`] - The segment type and the precedes relation.
//! * [`scoring`] - Block scores and the affine gap penalty.
//! * [`visited`] - Dense bit marks used during graph walks.
//! * [`node`] - DAG vertices, stored in an arena.
//! * [`tree`] - The merge tree: insertion, search, diagnostics.
//!
//! # Algorithm Overview
//!
//! 1. **Insertion**: walk down from the root to find the latest nodes
//!    preceding the new segment, and up from the leaves to find the earliest
//!    nodes following it. Link the new node between the two frontiers and
//!    drop edges it makes redundant.
//! 2. **Search**: `chain(node) = self(node) + max(gap(node, c) + chain(c))`
//!    over the children `c`, memoized per node.
//! 3. **Cancellation**: an optional callback is polled every 100 node visits.
//!
//! ```
//! use mergetree::libs::merge::{MergeTree, ScoringConfig, Segment, Strand};
//!
//! let a = Segment::new(0, 9, 0, 9, Strand::Plus);
//! let b = Segment::new(20, 29, 20, 29, Strand::Plus);
//! let c = Segment::new(15, 24, 40, 49, Strand::Plus);
//!
//! let mut tree = MergeTree::new(ScoringConfig::default());
//! tree.add_segments(&[a, b, c]).unwrap();
//!
//! let chain = tree.search(false);
//! assert_eq!(chain, vec![a, b]);
//! assert_eq!(tree.score(&chain).unwrap(), 49);
//! ```

pub mod error;
pub mod node;
pub mod scoring;
pub mod segment;
pub mod tree;
pub mod visited;

pub use error::ChainError;
pub use node::{ChainNode, NodeId, ROOT};
pub use scoring::ScoringConfig;
pub use segment::{Segment, SegmentKey, Strand};
pub use tree::{MergeTree, Progress, TraversalMode, INTERRUPT_INTERVAL};
pub use visited::VisitedSet;
