//! In-process aligner reporting exact occurrences of the queries on both subject strands.
//!
//! It is intended for small inputs and reproducible pipelines where every fragment is expected to be
//! a verbatim copy of the reference.

use eyre::Result;
use memchr::memmem;
use protmatch_core_rs::loc::{Location, Strand};
use protmatch_core_rs::seq;
use protmatch_io_rs::fasta;

use super::{DnaAligner, Hit, Parms};

/// Bit score awarded to every matched base.
const BITS_PER_BASE: f64 = 2.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct ExactAligner;

impl ExactAligner {
    fn occurrences(
        query: &fasta::Record,
        subject: &fasta::Record,
        hits: &mut Vec<Hit>,
    ) -> Result<()> {
        let needle = query.seq().to_ascii_lowercase();
        let haystack = subject.seq().to_ascii_lowercase();
        let qlen = needle.len() as u64;

        for (strand, needle) in [
            (Strand::Forward, needle.clone()),
            (Strand::Reverse, seq::reverse_complement(&needle)),
        ] {
            for start in memmem::find_iter(&haystack, &needle) {
                let left = start as u64 + 1;
                hits.push(Hit::new(
                    qlen,
                    Location::new(query.label(), 1, qlen, Strand::Forward)?,
                    haystack.len() as u64,
                    Location::new(subject.label(), left, left + qlen - 1, strand)?,
                    subject.id().clone(),
                    0.0,
                    100.0,
                    BITS_PER_BASE * qlen as f64,
                    qlen,
                    qlen,
                ));
            }
        }
        Ok(())
    }
}

impl DnaAligner for ExactAligner {
    fn align(
        &self,
        queries: &[fasta::Record],
        subjects: &[fasta::Record],
        parms: &Parms,
    ) -> Result<Vec<Hit>> {
        let mut hits = Vec::new();
        for query in queries {
            for subject in subjects {
                Self::occurrences(query, subject, &mut hits)?;
            }
        }
        Ok(parms.filter(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_hits() -> Result<()> {
        let queries: Vec<fasta::Record> = vec![
            ("frag.1 comment", "ACGTTG").try_into()?,
            ("frag.2", "gggggggg").try_into()?,
        ];
        let subjects: Vec<fasta::Record> = vec![("ctg1", "ttacgttgaacaacgtaa").try_into()?];

        let hits = ExactAligner.align(&queries, &subjects, &Parms::default())?;
        assert_eq!(hits.len(), 2);

        assert_eq!(hits[0].query_id(), "frag.1");
        assert_eq!(hits[0].subject_loc(), &Location::new("ctg1", 3, 8, Strand::Forward)?);
        assert_eq!(hits[1].subject_loc(), &Location::new("ctg1", 11, 16, Strand::Reverse)?);
        assert_eq!(*hits[1].align_len(), 6);
        assert_eq!(hits[1].query_coverage(), 100.0);
        Ok(())
    }
}
