use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use protmatch_core_rs::loc::Location;

/// Span of one or more nearby reading frames with the proteins they encode.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Locus {
    loc: Location,
    proteins: Vec<String>,
}

/// Groups reading frames of a single sequence into operons.
///
/// Loci live in an arena; a locus absorbed by a merge leaves a tombstone behind and the merged locus
/// is appended at the end. Every new frame makes a single pass over the live loci, growing as it
/// absorbs them.
#[derive(Clone, Debug)]
pub struct OperonAssembler {
    max_gap: u64,
    arena: Vec<Option<Locus>>,
}

impl OperonAssembler {
    pub fn new(max_gap: u64) -> Self {
        Self {
            max_gap,
            arena: Vec::new(),
        }
    }

    /// Add a frame and its protein, merging it with every locus closer than the maximum gap.
    ///
    /// The protein is placed after the proteins of the absorbed loci.
    pub fn add(&mut self, orf: Location, protein: String) -> usize {
        let mut loc = orf;
        let mut proteins = Vec::new();
        let mut merged = 0;
        let max_gap = self.max_gap;
        for slot in self.arena.iter_mut() {
            let close = slot
                .as_ref()
                .is_some_and(|x| x.loc.distance(&loc).is_some_and(|dist| dist < max_gap));
            if !close {
                continue;
            }
            if let Some(locus) = slot.take() {
                loc = loc.merged(&locus.loc);
                proteins.extend(locus.proteins);
                merged += 1;
            }
        }
        proteins.push(protein);
        self.arena.push(Some(Locus::new(loc, proteins)));
        merged
    }

    /// Number of live loci.
    pub fn len(&self) -> usize {
        self.arena.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live loci in the order of their last update.
    pub fn finish(self) -> Vec<Locus> {
        self.arena.into_iter().flatten().collect()
    }
}
