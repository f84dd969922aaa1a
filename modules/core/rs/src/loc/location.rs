use std::fmt::Display;
use std::str::FromStr;

use derive_getters::{Dissolve, Getters};
use eyre::{ensure, eyre, Report, Result};

use super::{Interval, Strand};
use crate::seq;

/// Stranded region of a named sequence in 1-based inclusive coordinates.
///
/// Locations are immutable values: operations that change the span return a new location.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Getters, Dissolve)]
pub struct Location {
    contig: String,
    left: u64,
    right: u64,
    strand: Strand,
}

impl Location {
    pub fn new(contig: impl Into<String>, left: u64, right: u64, strand: Strand) -> Result<Self> {
        let contig = contig.into();
        ensure!(!contig.is_empty(), "Location contig must not be empty");
        ensure!(
            left >= 1 && left <= right,
            "Invalid location {contig}: left ({left}) must be in [1, right ({right})]"
        );
        Ok(Self {
            contig,
            left,
            right,
            strand,
        })
    }

    /// Location from its begin (first transcribed base) and length, the way genomes describe features.
    pub fn from_begin(
        contig: impl Into<String>,
        begin: u64,
        strand: Strand,
        length: u64,
    ) -> Result<Self> {
        ensure!(length >= 1, "Location length must be positive");
        match strand {
            Strand::Forward => Self::new(contig, begin, begin + length - 1, strand),
            Strand::Reverse => {
                ensure!(
                    begin >= length,
                    "Reverse location of length {length} can't begin at {begin}"
                );
                Self::new(contig, begin + 1 - length, begin, strand)
            }
        }
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u64 {
        self.right - self.left + 1
    }

    /// First transcribed base: left on the forward strand, right on the reverse one.
    pub fn begin(&self) -> u64 {
        match self.strand {
            Strand::Forward => self.left,
            Strand::Reverse => self.right,
        }
    }

    /// Last transcribed base.
    pub fn end(&self) -> u64 {
        match self.strand {
            Strand::Forward => self.right,
            Strand::Reverse => self.left,
        }
    }

    pub fn contains(&self, pos: u64) -> bool {
        pos >= 1 && self.as_interval().contains(pos - 1)
    }

    /// Both locations share at least one base of the same contig, strands are ignored.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.contig == other.contig && self.as_interval().intersects(&other.as_interval())
    }

    /// Gap between two spans on the same contig: zero when they overlap, `None` for different contigs.
    ///
    /// Adjacent spans (`right + 1 == other.left`) are one base apart.
    pub fn distance(&self, other: &Self) -> Option<u64> {
        if self.contig != other.contig {
            return None;
        }
        let (this, that) = (self.as_interval(), other.as_interval());
        Some(match this.intersects(&that) {
            true => 0,
            false => this.gap(&that) + 1,
        })
    }

    /// Union of both spans (with any gap in between), keeping the contig and strand of `self`.
    pub fn merged(&self, other: &Self) -> Self {
        let span = self.as_interval().span(&other.as_interval());
        Self {
            contig: self.contig.clone(),
            left: span.start() + 1,
            right: span.end(),
            strand: self.strand,
        }
    }

    /// Pad the location on both sides, clipped to `[1, seq_len]`.
    pub fn expanded(&self, left: u64, right: u64, seq_len: u64) -> Self {
        Self {
            contig: self.contig.clone(),
            left: self.left.saturating_sub(left).max(1),
            right: self.right.saturating_add(right).min(seq_len).max(self.left),
            strand: self.strand,
        }
    }

    /// The same bases viewed from the reverse complement of a sequence of length `seq_len`.
    pub fn converse(&self, seq_len: u64) -> Result<Self> {
        ensure!(
            self.right <= seq_len,
            "Location {self} exceeds the sequence length ({seq_len})"
        );
        Ok(Self {
            contig: self.contig.clone(),
            left: seq_len - self.right + 1,
            right: seq_len - self.left + 1,
            strand: self.strand.flipped(),
        })
    }

    /// Same strand and contig with a different span.
    pub fn with_span(&self, left: u64, right: u64) -> Result<Self> {
        Self::new(self.contig.clone(), left, right, self.strand)
    }

    /// Nucleotides covered by the location, reverse complemented on the reverse strand.
    pub fn dna(&self, seq: &[u8]) -> Result<Vec<u8>> {
        ensure!(
            self.right as usize <= seq.len(),
            "Location {self} exceeds the sequence length ({})",
            seq.len()
        );
        let slice = &seq[self.left as usize - 1..self.right as usize];
        Ok(match self.strand {
            Strand::Forward => slice.to_vec(),
            Strand::Reverse => seq::reverse_complement(slice),
        })
    }

    /// Half-open, 0-based view of the span.
    pub fn as_interval(&self) -> Interval<u64> {
        // left >= 1 and left <= right, hence start < end
        Interval::new(self.left - 1, self.right).unwrap_or_else(|_| unreachable!())
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}_{}{}{}",
            self.contig,
            self.begin(),
            self.strand,
            self.len()
        )
    }
}

impl FromStr for Location {
    type Err = Report;

    /// Parse `contig_begin{+|-}length`, the contig being everything before the last underscore.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (contig, rest) = s
            .rsplit_once('_')
            .ok_or_else(|| eyre!("Invalid location string: {s:?}"))?;
        let split = rest
            .find(['+', '-'])
            .ok_or_else(|| eyre!("Location string without strand: {s:?}"))?;
        let (begin, length) = (&rest[..split], &rest[split + 1..]);
        let strand = Strand::try_from(&rest[split..split + 1])?;
        let begin = begin
            .parse::<u64>()
            .map_err(|e| eyre!("Invalid location begin in {s:?}: {e}"))?;
        let length = length
            .parse::<u64>()
            .map_err(|e| eyre!("Invalid location length in {s:?}: {e}"))?;
        Self::from_begin(contig, begin, strand, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(left: u64, right: u64, strand: Strand) -> Location {
        Location::new("ctg", left, right, strand).unwrap()
    }

    #[test]
    fn test_construct() {
        assert!(Location::new("ctg", 0, 10, Strand::Forward).is_err());
        assert!(Location::new("ctg", 11, 10, Strand::Forward).is_err());
        assert!(Location::new("", 1, 10, Strand::Forward).is_err());
        assert_eq!(loc(5, 5, Strand::Reverse).len(), 1);
        assert_eq!(
            Location::from_begin("ctg", 100, Strand::Reverse, 30).unwrap(),
            loc(71, 100, Strand::Reverse)
        );
        assert!(Location::from_begin("ctg", 10, Strand::Reverse, 30).is_err());
    }

    #[test]
    fn test_begin_end() {
        let fwd = loc(10, 20, Strand::Forward);
        assert_eq!((fwd.begin(), fwd.end()), (10, 20));
        let rev = loc(10, 20, Strand::Reverse);
        assert_eq!((rev.begin(), rev.end()), (20, 10));
    }

    #[test]
    fn test_contains() {
        let location = loc(10, 20, Strand::Reverse);
        assert!(!location.contains(0));
        assert!(!location.contains(9));
        assert!(location.contains(10));
        assert!(location.contains(20));
        assert!(!location.contains(21));
    }

    #[test]
    fn test_distance() {
        let first = loc(10, 20, Strand::Forward);
        assert_eq!(first.distance(&loc(60, 70, Strand::Forward)), Some(40));
        assert_eq!(loc(60, 70, Strand::Reverse).distance(&first), Some(40));
        assert_eq!(first.distance(&loc(15, 30, Strand::Forward)), Some(0));
        assert_eq!(first.distance(&loc(21, 30, Strand::Forward)), Some(1));
        let other = Location::new("other", 10, 20, Strand::Forward).unwrap();
        assert_eq!(first.distance(&other), None);
        assert!(!first.overlaps(&other));
        assert!(first.overlaps(&loc(20, 20, Strand::Reverse)));
    }

    #[test]
    fn test_merged() {
        let merged = loc(10, 20, Strand::Forward).merged(&loc(60, 70, Strand::Reverse));
        assert_eq!(merged, loc(10, 70, Strand::Forward));
        let merged = loc(60, 70, Strand::Forward).merged(&loc(65, 66, Strand::Forward));
        assert_eq!(merged, loc(60, 70, Strand::Forward));
    }

    #[test]
    fn test_expanded_is_clipped() {
        let location = loc(30, 90, Strand::Forward);
        assert_eq!(location.expanded(50, 50, 1000), loc(1, 140, Strand::Forward));
        assert_eq!(location.expanded(10, 50, 100), loc(20, 100, Strand::Forward));
        assert_eq!(
            loc(1, 100, Strand::Reverse).expanded(50, 50, 100),
            loc(1, 100, Strand::Reverse)
        );
        assert_eq!(location.expanded(0, 0, 1000), location);
    }

    #[test]
    fn test_converse() {
        let location = loc(1, 30, Strand::Reverse);
        let conversed = location.converse(100).unwrap();
        assert_eq!(conversed, loc(71, 100, Strand::Forward));
        assert_eq!(conversed.converse(100).unwrap(), location);
        assert!(loc(90, 101, Strand::Forward).converse(100).is_err());
    }

    #[test]
    fn test_dna() {
        let seq = b"aaacccgggtttatg";
        assert_eq!(loc(4, 9, Strand::Forward).dna(seq).unwrap(), b"cccggg");
        assert_eq!(loc(13, 15, Strand::Reverse).dna(seq).unwrap(), b"cat");
        assert!(loc(13, 16, Strand::Forward).dna(seq).is_err());
    }

    #[test]
    fn test_as_interval() {
        assert_eq!(loc(1, 10, Strand::Reverse).as_interval(), (0, 10));
    }

    #[test]
    fn test_display_and_parse() {
        let location =
            Location::new("559292.28.con.0003", 177450, 177956, Strand::Reverse).unwrap();
        assert_eq!(location.to_string(), "559292.28.con.0003_177956-507");
        assert_eq!("559292.28.con.0003_177956-507".parse::<Location>().unwrap(), location);

        let location = Location::new("NODE_1_length_500", 100, 129, Strand::Forward).unwrap();
        assert_eq!(location.to_string(), "NODE_1_length_500_100+30");
        assert_eq!(location.to_string().parse::<Location>().unwrap(), location);

        for invalid in ["ctg", "ctg_100", "ctg_x+10", "ctg_100+", "ctg_10-30", "_10+10"] {
            assert!(invalid.parse::<Location>().is_err(), "{invalid}");
        }
    }
}
