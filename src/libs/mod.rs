pub mod blast;
pub mod merge;
