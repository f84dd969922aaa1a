
use derive_getters::Dissolve;
use eyre::{eyre, Result};

use crate::num::PrimInt;

/// Half-open region [start, end) over a single sequence.
///
/// Empty intervals (start == end) and intervals with negative length are rejected at construction.
/// Interval trees and genome indices work with this representation, while user-facing coordinates
/// are 1-based inclusive [`Location`](super::Location)s.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(eyre!("Invalid interval: start >= end"))
        }
    }

    #[inline(always)]
    pub fn start(&self) -> Idx {
        self.start
    }

    #[inline(always)]
    pub fn end(&self) -> Idx {
        self.end
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Idx {
        self.end - self.start
    }

    pub fn contains(&self, pos: Idx) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Strict intersection, touching intervals don't intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Number of positions separating two intervals, zero if they intersect or touch.
    pub fn gap(&self, other: &Self) -> Idx {
        if other.start >= self.end {
            other.start - self.end
        } else if self.start >= other.end {
            self.start - other.end
        } else {
            Idx::zero()
        }
    }

    /// The smallest interval covering both intervals, gaps included.
    pub fn span(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construct() {
        assert_eq!(Interval::new(0, 10).unwrap(), (0, 10));
        assert!(Interval::new(1, 0).is_err());
        assert!(Interval::new(0, 0).is_err());
        assert_eq!(Interval::new(3u64, 10).unwrap().len(), 7);
    }

    #[test]
    fn test_contains() {
        let interval = Interval::new(1, 10).unwrap();
        assert!(!interval.contains(0));
        assert!(interval.contains(1));
        assert!(interval.contains(9));
        assert!(!interval.contains(10));
    }

    #[test]
    fn test_intersects() {
        let interval = Interval::new(1, 10).unwrap();
        assert!(!interval.intersects(&Interval::new(0, 1).unwrap()));
        assert!(interval.intersects(&Interval::new(9, 10).unwrap()));
        assert!(!interval.intersects(&Interval::new(10, 11).unwrap()));
    }

    #[test]
    fn test_gap() {
        let interval = Interval::new(10u64, 20).unwrap();
        assert_eq!(interval.gap(&Interval::new(25, 30).unwrap()), 5);
        assert_eq!(interval.gap(&Interval::new(0, 4).unwrap()), 6);
        assert_eq!(interval.gap(&Interval::new(20, 21).unwrap()), 0);
        assert_eq!(interval.gap(&Interval::new(15, 30).unwrap()), 0);
    }

    #[test]
    fn test_span() {
        let interval = Interval::new(1, 10).unwrap();
        assert_eq!(interval.span(&Interval::new(11, 12).unwrap()), (1, 12));
        assert_eq!(interval.span(&Interval::new(3, 4).unwrap()), (1, 10));
    }
}
