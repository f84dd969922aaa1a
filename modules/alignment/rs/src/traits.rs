use eyre::Result;
use impl_tools::autoimpl;
use protmatch_core_rs::seq::GeneticCode;
use protmatch_io_rs::fasta;

use super::{Hit, Parms};

/// Searches nucleotide sequences with a collection of protein profiles.
///
/// Queries of the returned hits are profiles, subjects are the searched sequences. Subject locations
/// carry the strand on which the protein is encoded.
#[autoimpl(for<T: trait + ?Sized> &T, Box<T>, std::sync::Arc<T>)]
pub trait ProfileSearch {
    /// Translated search of `sequences` using the given genetic code.
    fn profile(
        &self,
        sequences: &[fasta::Record],
        code: &GeneticCode,
        parms: &Parms,
    ) -> Result<Vec<Hit>>;
}

/// Aligns nucleotide queries against nucleotide subjects.
#[autoimpl(for<T: trait + ?Sized> &T, Box<T>, std::sync::Arc<T>)]
pub trait DnaAligner {
    fn align(
        &self,
        queries: &[fasta::Record],
        subjects: &[fasta::Record],
        parms: &Parms,
    ) -> Result<Vec<Hit>>;
}
