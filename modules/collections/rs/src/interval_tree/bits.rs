//! Implementation of an interval tree using the BITS algorithm.
//! Reference: https://doi.org/10.1093/bioinformatics/bts652

use derive_getters::Dissolve;
use itertools::Itertools;
use protmatch_core_rs::{loc::Interval, num::PrimInt};

/// Static interval tree: intervals are sorted by start once, queries binary search the first
/// candidate and scan forward.
#[derive(Debug, Clone, PartialEq, Eq, Dissolve)]
pub struct Bits<Idx: PrimInt, Data> {
    // Associated data elements, corresponding to intervals at the same index.
    data: Vec<Data>,
    // Interval start coordinates, sorted.
    starts: Vec<Idx>,
    // Interval end coordinates, corresponding to `starts`.
    ends: Vec<Idx>,
    // The maximum length of any interval in the tree. Used for query optimization.
    max_len: Idx,
}

impl<Idx: PrimInt, Data> Default for Bits<Idx, Data> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            starts: Vec::new(),
            ends: Vec::new(),
            max_len: Idx::zero(),
        }
    }
}

impl<Idx: PrimInt, Data> Bits<Idx, Data> {
    /// Creates a new tree from `(Interval, Data)` pairs. Intervals with equal starts keep
    /// their input order.
    pub fn new(iter: impl IntoIterator<Item = (Interval<Idx>, Data)>) -> Self {
        let iter = iter.into_iter();

        let explen = iter.size_hint().0;
        let mut starts = Vec::with_capacity(explen);
        let mut ends = Vec::with_capacity(explen);
        let mut data = Vec::with_capacity(explen);
        let mut max_len = Idx::zero();

        for (interval, idata) in iter.sorted_by_key(|(it, _)| it.start()) {
            starts.push(interval.start());
            ends.push(interval.end());
            data.push(idata);
            max_len = max_len.max(interval.len());
        }

        Self {
            data,
            starts,
            ends,
            max_len,
        }
    }

    #[inline]
    fn lower_bound(&self, start: Idx) -> usize {
        // Nothing that starts before `start - max_len` can reach the query.
        let boundary = start.saturating_sub(self.max_len);
        self.starts.partition_point(|x| *x < boundary)
    }

    /// Iterate over entries overlapping the given interval, sorted by their start.
    #[inline]
    pub fn query(&self, interval: Interval<Idx>) -> Iter<'_, Idx, Data> {
        Iter {
            query: interval,
            cursor: self.lower_bound(interval.start()),
            bits: self,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }
}

/// Iterator over overlapping intervals produced by [`Bits::query`].
pub struct Iter<'tree, Idx: PrimInt, Data> {
    query: Interval<Idx>,
    // Might be behind the next overlapping interval, but never ahead of it.
    cursor: usize,
    bits: &'tree Bits<Idx, Data>,
}

impl<'tree, Idx: PrimInt, Data> Iterator for Iter<'tree, Idx, Data> {
    type Item = (Interval<Idx>, &'tree Data);

    fn next(&mut self) -> Option<Self::Item> {
        let bits = self.bits;
        loop {
            if self.cursor >= bits.len() || bits.starts[self.cursor] >= self.query.end() {
                return None;
            }
            let cursor = self.cursor;
            self.cursor += 1;

            if bits.ends[cursor] > self.query.start() {
                let segment = Interval::new(bits.starts[cursor], bits.ends[cursor]).ok()?;
                debug_assert!(segment.intersects(&self.query));
                return Some((segment, &bits.data[cursor]));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Bits<u64, &'static str> {
        Bits::new([
            (Interval::new(10, 20).unwrap(), "a"),
            (Interval::new(0, 5).unwrap(), "b"),
            (Interval::new(15, 100).unwrap(), "c"),
            (Interval::new(30, 40).unwrap(), "d"),
            (Interval::new(10, 12).unwrap(), "e"),
        ])
    }

    fn query(tree: &Bits<u64, &'static str>, start: u64, end: u64) -> Vec<&'static str> {
        tree.query(Interval::new(start, end).unwrap())
            .map(|(_, data)| *data)
            .collect()
    }

    #[test]
    fn test_construct() {
        let tree = tree();
        assert_eq!(tree.len(), 5);
        assert!(!tree.is_empty());
        // Equal starts keep their input order
        assert_eq!(query(&tree, 0, 1000), ["b", "a", "e", "c", "d"]);
        assert!(Bits::<u64, ()>::default().is_empty());
    }

    #[test]
    fn test_query() {
        let tree = tree();
        assert_eq!(query(&tree, 0, 1), ["b"]);
        assert_eq!(query(&tree, 5, 10), Vec::<&str>::new());
        assert_eq!(query(&tree, 11, 16), ["a", "e", "c"]);
        assert_eq!(query(&tree, 35, 36), ["c", "d"]);
        assert_eq!(query(&tree, 99, 1000), ["c"]);
        assert_eq!(query(&tree, 100, 1000), Vec::<&str>::new());
    }

    #[test]
    fn test_query_intervals() {
        let tree = tree();
        let hits: Vec<_> = tree
            .query(Interval::new(19, 31).unwrap())
            .map(|(it, _)| it)
            .collect();
        assert_eq!(hits, [(10, 20), (15, 100), (30, 40)]);
    }
}
