use super::segment::Segment;
use std::cmp;

/// Match/mismatch weights and affine gap costs.
///
/// Gap costs are expressed as (usually negative) score contributions, so a
/// penalty is *added* to a chain's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoringConfig {
    pub match_score: i64,
    pub mismatch: i64,
    pub gap_open: i64,
    pub gap_extend: i64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            match_score: 3,
            mismatch: -1,
            gap_open: -1,
            gap_extend: -1,
        }
    }
}

impl ScoringConfig {
    pub fn new(match_score: i64, mismatch: i64, gap_open: i64, gap_extend: i64) -> Self {
        Self {
            match_score,
            mismatch,
            gap_open,
            gap_extend,
        }
    }

    /// Intrinsic score of one block.
    ///
    /// Column counts beyond `i64::MAX` and the products saturate.
    pub fn self_score(&self, segment: &Segment) -> i64 {
        let len = segment.len();
        let mismatches = cmp::min(segment.mismatches, len);
        weigh(len - mismatches, self.match_score).saturating_add(weigh(mismatches, self.mismatch))
    }

    /// Affine penalty for joining `early` to `late`.
    ///
    /// Only the larger of the two axis gaps is charged. Adjacent blocks cost
    /// nothing.
    pub fn gap_penalty(&self, early: &Segment, late: &Segment) -> i64 {
        let (q_gap, s_gap) = early.gaps_to(late);
        if q_gap == 0 && s_gap == 0 {
            return 0;
        }
        self.gap_open.saturating_add(weigh(cmp::max(q_gap, s_gap), self.gap_extend))
    }
}

/// `count * weight`, saturating instead of wrapping.
fn weigh(count: u64, weight: i64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX).saturating_mul(weight)
}
