use crate::libs::merge::{Segment, Strand};

/// One line of BLAST tabular output (`-outfmt 6`).
///
/// Coordinates are 1-based and inclusive, as BLAST writes them. A hit whose
/// `s_start` is greater than its `s_end` lies on the minus strand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlastHit {
    pub query: String,
    pub subject: String,
    pub pident: f64,
    pub length: u64,
    pub mismatch: u64,
    pub gap_open: u64,
    pub q_start: u64,
    pub q_end: u64,
    pub s_start: u64,
    pub s_end: u64,
    pub evalue: f64,
    pub bitscore: f64,
}

impl BlastHit {
    pub fn strand(&self) -> Strand {
        if self.s_start > self.s_end {
            Strand::Minus
        } else {
            Strand::Plus
        }
    }

    /// The hit as a merge segment, subject interval normalized low-to-high.
    pub fn to_segment(&self) -> Segment {
        let (q_start, q_end) = if self.q_start <= self.q_end {
            (self.q_start, self.q_end)
        } else {
            (self.q_end, self.q_start)
        };
        let (s_start, s_end) = if self.s_start <= self.s_end {
            (self.s_start, self.s_end)
        } else {
            (self.s_end, self.s_start)
        };
        Segment::new(q_start, q_end, s_start, s_end, self.strand()).with_mismatches(self.mismatch)
    }
}

impl std::str::FromStr for BlastHit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split('\t').collect();
        if fields.len() < 12 {
            return Err(anyhow::anyhow!(
                "Invalid BLAST tabular line: fewer than 12 columns"
            ));
        }

        let parse_u64 = |s: &str| {
            s.trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("Invalid u64: {}", s))
        };
        let parse_f64 = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("Invalid f64: {}", s))
        };

        Ok(BlastHit {
            query: fields[0].to_string(),
            subject: fields[1].to_string(),
            pident: parse_f64(fields[2])?,
            length: parse_u64(fields[3])?,
            mismatch: parse_u64(fields[4])?,
            gap_open: parse_u64(fields[5])?,
            q_start: parse_u64(fields[6])?,
            q_end: parse_u64(fields[7])?,
            s_start: parse_u64(fields[8])?,
            s_end: parse_u64(fields[9])?,
            evalue: parse_f64(fields[10])?,
            bitscore: parse_f64(fields[11])?,
        })
    }
}
