use derive_getters::{Dissolve, Getters};
use eyre::{Result, WrapErr};
use log::warn;
use md5::{Digest, Md5};
use protmatch_alignment_rs::pairwise::Edits;
use protmatch_collections_rs::genomic_index::GenomicIndex;
use protmatch_core_rs::kmers::ProteinKmers;
use protmatch_core_rs::loc::{Location, Strand};
use protmatch_core_rs::seq::{self, GeneticCode};
use protmatch_io_rs::gti;
use protmatch_io_rs::gto::{Feature, Genome};

use crate::config::Config;
use crate::kind::ErrorKind;

/// Verdict for a single discovered protein.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct Verification {
    sample_id: String,
    /// MD5 digest of the protein sequence.
    protein_id: String,
    fragment_id: String,
    location: Location,
    best_feature: Option<String>,
    distance: f64,
    kind: ErrorKind,
    note: String,
    /// Reading frame of the best feature extended upstream, reported for imperfect matches.
    orf: Option<Location>,
}

pub fn protein_id(protein: &str) -> String {
    format!("{:x}", Md5::digest(protein.as_bytes()))
}

/// Classify how a found protein differs from the annotated one.
///
/// The first residue is ignored when looking for N-terminal extensions or truncations, since
/// alternative start codons translate differently.
pub fn discrepancy(reference: &str, found: &str) -> (ErrorKind, String) {
    let tail = |x: &str| x.get(1..).unwrap_or_default().to_string();
    let (ref_tail, found_tail) = (tail(reference), tail(found));

    if found.len() > reference.len() {
        if found_tail.ends_with(&ref_tail) {
            let extra = found.len() - reference.len();
            return (
                ErrorKind::TooLong,
                format!("Found sequence has {extra} extra codons."),
            );
        }
    } else if ref_tail.ends_with(&found_tail) {
        let fewer = reference.len() - found.len();
        return (
            ErrorKind::TooShort,
            format!("Found sequence has {fewer} fewer codons."),
        );
    }

    let edits = Edits::between(reference.as_bytes(), found.as_bytes());
    (
        ErrorKind::Changed,
        format!(
            "Found sequence has {} insertions, {} deletions, and {} substitutions.",
            edits.insertions(),
            edits.deletions(),
            edits.substitutions()
        ),
    )
}

/// Extend a coding location upstream, codon by codon, until the previous in-frame stop codon
/// (excluded) or the contig edge.
pub fn extend_to_orf(loc: &Location, contig: &[u8], code: &GeneticCode) -> Result<Location> {
    let len = contig.len() as u64;
    eyre::ensure!(
        *loc.right() <= len,
        "Location {loc} exceeds the contig length ({len})"
    );
    match loc.strand() {
        Strand::Forward => {
            let mut left = *loc.left();
            while left > 3 && !code.is_stop(&contig[left as usize - 4..left as usize - 1]) {
                left -= 3;
            }
            loc.with_span(left, *loc.right())
        }
        Strand::Reverse => {
            let mut right = *loc.right();
            while right + 3 <= len {
                let codon = seq::reverse_complement(&contig[right as usize..right as usize + 3]);
                if code.is_stop(&codon) {
                    break;
                }
                right += 3;
            }
            loc.with_span(*loc.left(), right)
        }
    }
}

/// Compares discovered proteins with the annotated proteins of the genome region they come from.
pub struct Verifier<'a> {
    genome: &'a Genome,
    code: GeneticCode,
    kmer_size: usize,
    index: GenomicIndex<(&'a Feature, ProteinKmers)>,
}

impl<'a> Verifier<'a> {
    pub fn new(genome: &'a Genome, config: &Config) -> Result<Self> {
        let code = GeneticCode::new(*genome.genetic_code())
            .wrap_err_with(|| format!("Genome {} can't be verified", genome.id()))?;
        let kmer_size = *config.kmer_size();
        let index = GenomicIndex::new(genome.pegs().filter_map(|feature| {
            let protein = feature.protein().as_ref()?;
            let kmers = ProteinKmers::new(protein.clone(), kmer_size);
            Some((feature.location().clone(), (feature, kmers)))
        }));
        Ok(Self {
            genome,
            code,
            kmer_size,
            index,
        })
    }

    /// Verdicts for every protein of a record, in the record order.
    pub fn verify(&self, record: &gti::Record) -> Vec<Verification> {
        let features: Vec<&(&Feature, ProteinKmers)> = self
            .index
            .overlap(record.location())
            .map(|(_, data)| data)
            .collect();
        record
            .proteins()
            .iter()
            .map(|protein| self.classify(record, protein, &features))
            .collect()
    }

    fn classify(
        &self,
        record: &gti::Record,
        protein: &str,
        features: &[&(&Feature, ProteinKmers)],
    ) -> Verification {
        let kmers = ProteinKmers::new(protein, self.kmer_size);
        let mut distance = 1.0;
        let mut best = None;
        for (feature, reference) in features.iter().copied() {
            let dist = kmers.distance(reference);
            if dist < distance {
                distance = dist;
                best = Some((*feature, reference));
            }
        }

        let (kind, note, orf) = match best {
            None => (ErrorKind::NotFound, "No match found.".to_string(), None),
            Some(_) if distance == 0.0 => (ErrorKind::Exact, String::new(), None),
            Some((feature, reference)) => {
                let (kind, note) = discrepancy(reference.protein(), protein);
                (kind, note, self.orf(feature))
            }
        };

        Verification {
            sample_id: record.sample_id().clone(),
            protein_id: protein_id(protein),
            fragment_id: record.fragment_id().clone(),
            location: record.location().clone(),
            best_feature: best.map(|(feature, _)| feature.id().clone()),
            distance,
            kind,
            note,
            orf,
        }
    }

    fn orf(&self, feature: &Feature) -> Option<Location> {
        let loc = feature.location();
        let extended = self
            .genome
            .contig(loc.contig())
            .ok_or_else(|| eyre::eyre!("Unknown contig {}", loc.contig()))
            .and_then(|contig| extend_to_orf(loc, contig.dna(), &self.code));
        match extended {
            Ok(orf) => Some(orf),
            Err(err) => {
                warn!("Can't extend feature {}: {err}", feature.id());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrepancy() {
        let reference = "MKTAYIAKQRQISFVK";

        let (kind, note) = discrepancy(reference, "MLLKTAYIAKQRQISFVK");
        assert_eq!(kind, ErrorKind::TooLong);
        assert_eq!(note, "Found sequence has 2 extra codons.");

        let (kind, note) = discrepancy(reference, "MYIAKQRQISFVK");
        assert_eq!(kind, ErrorKind::TooShort);
        assert_eq!(note, "Found sequence has 3 fewer codons.");

        // Different start residue, same length
        let (kind, note) = discrepancy(reference, "VKTAYIAKQRQISFVK");
        assert_eq!(kind, ErrorKind::TooShort);
        assert_eq!(note, "Found sequence has 0 fewer codons.");

        let (kind, note) = discrepancy(reference, "MKTAYIAKWRQISFVKE");
        assert_eq!(kind, ErrorKind::Changed);
        assert_eq!(
            note,
            "Found sequence has 1 insertions, 0 deletions, and 1 substitutions."
        );
    }

    #[test]
    fn test_extend_to_orf() {
        let code = GeneticCode::new(11).unwrap();
        //            1  4  7  10 13 16 19 22 25
        let contig = b"gcctaagccgccatggcctaagcctta";

        // Stops right before the taa at 4..6
        let loc = Location::new("ctg", 13, 18, Strand::Forward).unwrap();
        assert_eq!(
            extend_to_orf(&loc, contig, &code).unwrap(),
            Location::new("ctg", 7, 18, Strand::Forward).unwrap()
        );

        // No stop upstream: up to the last whole codon
        let loc = Location::new("ctg", 8, 10, Strand::Forward).unwrap();
        assert_eq!(*extend_to_orf(&loc, contig, &code).unwrap().left(), 2);

        // Reverse strand: 25..27 is tta, a stop on the reverse strand
        let loc = Location::new("ctg", 10, 15, Strand::Reverse).unwrap();
        assert_eq!(
            extend_to_orf(&loc, contig, &code).unwrap(),
            Location::new("ctg", 10, 24, Strand::Reverse).unwrap()
        );

        let loc = Location::new("ctg", 10, 30, Strand::Reverse).unwrap();
        assert!(extend_to_orf(&loc, contig, &code).is_err());
    }

    #[test]
    fn test_protein_id() {
        assert_eq!(protein_id(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(protein_id("MKR").len(), 32);
    }
}
