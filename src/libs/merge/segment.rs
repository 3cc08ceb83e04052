use super::error::ChainError;
use std::cmp;
use std::fmt;

/// Orientation of the subject interval relative to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strand {
    Plus,
    Minus,
}

impl Strand {
    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for Strand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            _ => Err(anyhow::anyhow!("Invalid strand: {}", s)),
        }
    }
}

/// Coordinates that identify a segment inside one tree.
pub type SegmentKey = (u64, u64, u64, u64, Strand);

/// A gap-free local alignment block.
///
/// All coordinates are inclusive. On the minus strand the subject interval is
/// still stored low-to-high, but it runs backwards along the query: a later
/// block sits at *lower* subject coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub query_start: u64,
    pub query_end: u64,
    pub subject_start: u64,
    pub subject_end: u64,
    pub strand: Strand,
    /// Mismatched columns inside the block
    pub mismatches: u64,
}

impl Segment {
    pub fn new(
        query_start: u64,
        query_end: u64,
        subject_start: u64,
        subject_end: u64,
        strand: Strand,
    ) -> Self {
        Self {
            query_start,
            query_end,
            subject_start,
            subject_end,
            strand,
            mismatches: 0,
        }
    }

    pub fn with_mismatches(mut self, mismatches: u64) -> Self {
        self.mismatches = mismatches;
        self
    }

    /// Aligned columns. Query and subject spans normally agree; the shorter
    /// one wins when they don't.
    ///
    /// A span covering the whole `u64` range saturates at `u64::MAX`.
    pub fn len(&self) -> u64 {
        let span = |start: u64, end: u64| end.checked_sub(start).map_or(0, |d| d.saturating_add(1));
        cmp::min(
            span(self.query_start, self.query_end),
            span(self.subject_start, self.subject_end),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key(&self) -> SegmentKey {
        (
            self.query_start,
            self.query_end,
            self.subject_start,
            self.subject_end,
            self.strand,
        )
    }

    pub fn validate(&self) -> Result<(), ChainError> {
        let reason = if self.query_end < self.query_start {
            "query_end < query_start".to_string()
        } else if self.subject_end < self.subject_start {
            "subject_end < subject_start".to_string()
        } else if self.mismatches > self.len() {
            format!("{} mismatches in {} columns", self.mismatches, self.len())
        } else {
            return Ok(());
        };

        Err(ChainError::MalformedSegment {
            segment: *self,
            reason,
        })
    }

    /// Strict "comes before" in both axes, strand-aware.
    ///
    /// Segments on different strands, and segments that overlap or touch-over
    /// on either axis, are incomparable.
    pub fn precedes(&self, later: &Segment) -> bool {
        if self.strand != later.strand || self.query_end >= later.query_start {
            return false;
        }
        match self.strand {
            Strand::Plus => self.subject_end < later.subject_start,
            Strand::Minus => self.subject_start > later.subject_end,
        }
    }

    /// Unaligned bases between `self` and `later` on the query and subject.
    ///
    /// Only meaningful when `self.precedes(later)`; saturates at zero otherwise.
    pub fn gaps_to(&self, later: &Segment) -> (u64, u64) {
        let between = |low_end: u64, high_start: u64| {
            high_start.saturating_sub(low_end).saturating_sub(1)
        };
        let q_gap = between(self.query_end, later.query_start);
        let s_gap = match self.strand {
            Strand::Plus => between(self.subject_end, later.subject_start),
            Strand::Minus => between(later.subject_end, self.subject_start),
        };
        (q_gap, s_gap)
    }

    /// Short human readable form, e.g. `q0-9 s0-9 +`
    pub fn label(&self) -> String {
        format!(
            "q{}-{} s{}-{} {}",
            self.query_start, self.query_end, self.subject_start, self.subject_end, self.strand
        )
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.query_start,
            self.query_end,
            self.subject_start,
            self.subject_end,
            self.strand,
            self.mismatches
        )
    }
}

/// Parses `q_start q_end s_start s_end strand [mismatches]`, tab separated.
impl std::str::FromStr for Segment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('\t').collect();
        if fields.len() < 5 {
            return Err(anyhow::anyhow!(
                "Invalid segment line: fewer than 5 columns: {}",
                s
            ));
        }

        let parse_u64 = |s: &str| {
            s.trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("Invalid coordinate: {}", s))
        };

        let mut segment = Segment::new(
            parse_u64(fields[0])?,
            parse_u64(fields[1])?,
            parse_u64(fields[2])?,
            parse_u64(fields[3])?,
            fields[4].trim().parse()?,
        );
        if let Some(field) = fields.get(5) {
            segment.mismatches = parse_u64(field)?;
        }

        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus(qs: u64, qe: u64, ss: u64, se: u64) -> Segment {
        Segment::new(qs, qe, ss, se, Strand::Plus)
    }

    fn minus(qs: u64, qe: u64, ss: u64, se: u64) -> Segment {
        Segment::new(qs, qe, ss, se, Strand::Minus)
    }

    #[test]
    fn test_precedes_plus() {
        let a = plus(0, 9, 0, 9);
        let b = plus(20, 29, 20, 29);
        let c = plus(15, 24, 40, 49);

        assert!(a.precedes(&b));
        assert!(a.precedes(&c));
        assert!(!b.precedes(&a));
        assert!(!a.precedes(&a));

        // overlap on query
        assert!(!b.precedes(&c));
        assert!(!c.precedes(&b));

        // adjacent but not overlapping
        assert!(plus(0, 9, 0, 9).precedes(&plus(10, 19, 10, 19)));
        // touching on the subject axis
        assert!(!plus(0, 9, 0, 9).precedes(&plus(10, 19, 9, 18)));
    }

    #[test]
    fn test_precedes_minus() {
        // subject runs backwards
        let a = minus(0, 9, 90, 99);
        let b = minus(20, 29, 60, 69);
        assert!(a.precedes(&b));
        assert!(!b.precedes(&a));

        // same coordinates on opposite strands never chain
        assert!(!plus(0, 9, 90, 99).precedes(&b));
        assert!(!a.precedes(&plus(20, 29, 60, 69)));
    }

    #[test]
    fn test_gaps_to() {
        assert_eq!(plus(0, 9, 0, 9).gaps_to(&plus(20, 29, 20, 29)), (10, 10));
        assert_eq!(plus(0, 9, 0, 9).gaps_to(&plus(15, 24, 40, 49)), (5, 30));
        assert_eq!(plus(0, 9, 0, 9).gaps_to(&plus(10, 19, 10, 19)), (0, 0));
        assert_eq!(minus(0, 9, 90, 99).gaps_to(&minus(20, 29, 60, 69)), (10, 20));

        let whole = plus(0, u64::MAX, 0, u64::MAX);
        assert_eq!(whole.gaps_to(&whole), (0, 0));
        assert_eq!(
            plus(0, 9, 0, 9).gaps_to(&plus(u64::MAX, u64::MAX, u64::MAX, u64::MAX)),
            (u64::MAX - 10, u64::MAX - 10)
        );
        assert_eq!(
            minus(0, 9, u64::MAX - 9, u64::MAX).gaps_to(&minus(20, 29, 0, 9)),
            (10, u64::MAX - 19)
        );
    }

    #[test]
    fn test_validate() {
        assert!(plus(0, 9, 0, 9).validate().is_ok());
        assert!(plus(5, 5, 7, 7).validate().is_ok());

        match plus(9, 0, 0, 9).validate() {
            Err(ChainError::MalformedSegment { reason, .. }) => {
                assert_eq!(reason, "query_end < query_start")
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(plus(0, 9, 9, 0).validate().is_err());
        assert!(plus(0, 9, 0, 9).with_mismatches(11).validate().is_err());
    }

    #[test]
    fn test_len() {
        assert_eq!(plus(0, 9, 0, 9).len(), 10);
        assert_eq!(plus(0, 9, 0, 4).len(), 5);
        assert_eq!(plus(3, 3, 8, 8).len(), 1);

        // spans reaching the end of the coordinate range
        assert_eq!(plus(10, u64::MAX, 10, u64::MAX).len(), u64::MAX - 9);
        assert_eq!(plus(0, u64::MAX, 0, u64::MAX).len(), u64::MAX);
        assert!(plus(10, u64::MAX, 10, u64::MAX).validate().is_ok());
    }

    #[test]
    fn test_parse() {
        let seg: Segment = "0\t9\t10\t19\t+".parse().unwrap();
        assert_eq!(seg, plus(0, 9, 10, 19));

        let seg: Segment = "0\t9\t10\t19\t-\t2".parse().unwrap();
        assert_eq!(seg, minus(0, 9, 10, 19).with_mismatches(2));
        assert_eq!(seg.to_string(), "0\t9\t10\t19\t-\t2");

        assert!("0\t9\t10".parse::<Segment>().is_err());
        assert!("0\t9\t10\t19\t*".parse::<Segment>().is_err());
        assert!("a\t9\t10\t19\t+".parse::<Segment>().is_err());
    }
}
