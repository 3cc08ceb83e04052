use super::segment::Segment;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    /// A segment whose coordinates cannot describe a gap-free block
    MalformedSegment {
        /// The offending segment
        segment: Segment,
        /// What is wrong with it
        reason: String,
    },
    /// Two consecutive chain members where the first does not precede the second
    UnorderedChain {
        /// Position (0-based) of the later member of the offending pair
        index: usize,
    },
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::MalformedSegment { segment, reason } => {
                write!(f, "Malformed segment [{}]: {}", segment.label(), reason)
            }
            ChainError::UnorderedChain { index } => write!(
                f,
                "Chain is not ordered: member {} does not precede member {}",
                index - 1,
                index
            ),
        }
    }
}

impl std::error::Error for ChainError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::merge::Strand;

    #[test]
    fn test_error_display() {
        let err = ChainError::UnorderedChain { index: 2 };
        assert_eq!(
            err.to_string(),
            "Chain is not ordered: member 1 does not precede member 2"
        );

        let err = ChainError::MalformedSegment {
            segment: Segment::new(9, 0, 0, 9, Strand::Plus),
            reason: "query_end < query_start".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed segment [q9-0 s0-9 +]: query_end < query_start"
        );
    }
}
