use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use protmatch_core_rs::loc::Location;

/// A single local alignment reported by an aligner.
///
/// Query and subject locations are 1-based inclusive. The subject strand tells on which strand of the
/// subject sequence the query was found.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Hit {
    query_len: u64,
    query_loc: Location,
    subject_len: u64,
    subject_loc: Location,
    subject_def: String,
    evalue: f64,
    pct_identity: f64,
    bit_score: f64,
    n_ident: u64,
    align_len: u64,
}

impl Hit {
    pub fn query_id(&self) -> &str {
        self.query_loc.contig()
    }

    pub fn subject_id(&self) -> &str {
        self.subject_loc.contig()
    }

    /// Bit score normalized by the query length.
    pub fn query_bit_score(&self) -> f64 {
        self.bit_score / self.query_len.max(1) as f64
    }

    /// Fraction of query positions that are identical in the alignment.
    pub fn query_identity(&self) -> f64 {
        self.n_ident as f64 / self.query_len.max(1) as f64
    }

    /// Percent of the query covered by the alignment.
    pub fn query_coverage(&self) -> f64 {
        100.0 * self.query_loc.len() as f64 / self.query_len.max(1) as f64
    }

    /// Percent of the subject covered by the alignment.
    pub fn subject_coverage(&self) -> f64 {
        100.0 * self.subject_loc.len() as f64 / self.subject_len.max(1) as f64
    }
}
