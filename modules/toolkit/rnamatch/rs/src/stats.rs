use std::fmt::Display;

use derive_getters::Getters;
use derive_more::AddAssign;

/// Counters of a pipeline run. Every recoverable drop is accounted for here.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Getters, AddAssign)]
pub struct Stats {
    pub(crate) sequences: usize,
    pub(crate) sequences_with_hits: usize,
    pub(crate) profile_hits: usize,
    pub(crate) wrong_strand: usize,
    pub(crate) extension_failures: usize,
    pub(crate) redundant: usize,
    pub(crate) internal_stops: usize,
    pub(crate) proteins: usize,
    pub(crate) merges: usize,
    pub(crate) fragments: usize,
    pub(crate) batches: usize,
    pub(crate) unplaced: usize,
    pub(crate) records: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} sequences ({} with hits), {} profile hits ({} on the wrong strand, {} not extended, \
             {} redundant), {} proteins ({} with internal stops dropped), {} merges, {} fragments \
             in {} batches, {} unplaced, {} records",
            self.sequences,
            self.sequences_with_hits,
            self.profile_hits,
            self.wrong_strand,
            self.extension_failures,
            self.redundant,
            self.proteins,
            self.internal_stops,
            self.merges,
            self.fragments,
            self.batches,
            self.unplaced,
            self.records
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate() {
        let mut total = Stats::default();
        let sample = Stats {
            sequences: 3,
            fragments: 2,
            records: 1,
            ..Default::default()
        };
        total += sample;
        total += sample;
        assert_eq!(*total.sequences(), 6);
        assert_eq!(*total.fragments(), 4);
        assert_eq!(*total.records(), 2);
        assert_eq!(*total.unplaced(), 0);
    }
}
