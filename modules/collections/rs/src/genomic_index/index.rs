use ahash::AHashMap;
use derive_getters::Dissolve;

use protmatch_core_rs::loc::{Interval, Location};

use crate::interval_tree::Bits;

/// Per-contig interval trees over annotated locations. Queries ignore the strand.
#[derive(Clone, Debug, Dissolve)]
pub struct GenomicIndex<Data> {
    itrees: AHashMap<String, Bits<u64, (Location, Data)>>,
}

impl<Data> Default for GenomicIndex<Data> {
    fn default() -> Self {
        Self {
            itrees: AHashMap::new(),
        }
    }
}

impl<Data> GenomicIndex<Data> {
    pub fn new(records: impl IntoIterator<Item = (Location, Data)>) -> Self {
        let mut grouped: AHashMap<String, Vec<(Interval<u64>, (Location, Data))>> =
            AHashMap::new();
        for (location, data) in records {
            grouped
                .entry(location.contig().clone())
                .or_default()
                .push((location.as_interval(), (location, data)));
        }

        let itrees = grouped
            .into_iter()
            .map(|(contig, records)| (contig, Bits::new(records)))
            .collect();
        Self { itrees }
    }

    /// Number of indexed locations.
    pub fn len(&self) -> usize {
        self.itrees.values().map(|x| x.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.itrees.values().all(|x| x.is_empty())
    }

    /// Entries sharing at least one base with the query, in the order of their left edge.
    pub fn overlap<'a>(
        &'a self,
        query: &Location,
    ) -> impl Iterator<Item = (&'a Location, &'a Data)> + 'a {
        let interval = query.as_interval();
        self.itrees
            .get(query.contig())
            .into_iter()
            .flat_map(move |tree| tree.query(interval))
            .map(|(_, (location, data))| (location, data))
    }
}
