use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};
use eyre::{Result, WrapErr};
use log::{debug, warn};
use protmatch_alignment_rs::{DnaAligner, Hit, Parms};
use protmatch_io_rs::gto::Genome;
use protmatch_io_rs::{fasta, gti};

use crate::fragment::Fragment;
use crate::hitlog::Placement;

/// Outcome of a single relocalization round.
#[derive(Clone, PartialEq, Debug, Default, Dissolve, Getters)]
pub struct Relocalized {
    records: Vec<gti::Record>,
    placements: Vec<Placement>,
    /// Fragments without an acceptable genome hit.
    unplaced: usize,
}

/// Places RNA fragments on the genome they were sequenced from.
pub struct Relocalizer<'a, A> {
    aligner: A,
    parms: Parms,
    flank: u64,
    genome: &'a Genome,
    contigs: Vec<fasta::Record>,
}

impl<'a, A: DnaAligner> Relocalizer<'a, A> {
    pub fn new(aligner: A, parms: Parms, flank: u64, genome: &'a Genome) -> Result<Self> {
        let contigs = genome
            .contigs()
            .iter()
            .filter(|x| !x.dna().is_empty())
            .map(|x| {
                fasta::Record::new(x.id().clone(), x.dna().clone())
                    .wrap_err_with(|| {
                        format!("Invalid contig {} in genome {}", x.id(), genome.id())
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            aligner,
            parms,
            flank,
            genome,
            contigs,
        })
    }

    /// Align the fragments to the genome and keep the longest alignment of each one, padded by the
    /// flank on both sides.
    pub fn relocalize(&self, sample_id: &str, fragments: Vec<Fragment>) -> Result<Relocalized> {
        let mut result = Relocalized::default();
        if fragments.is_empty() {
            return Ok(result);
        }

        let queries = fragments
            .iter()
            .map(Fragment::to_fasta)
            .collect::<Result<Vec<_>>>()?;
        let hits = self.aligner.align(&queries, &self.contigs, &self.parms)?;

        let mut best: AHashMap<&str, &Hit> = AHashMap::new();
        for hit in &hits {
            best.entry(hit.query_id())
                .and_modify(|x| {
                    if hit.align_len() > x.align_len() {
                        *x = hit;
                    }
                })
                .or_insert(hit);
        }

        for fragment in fragments {
            let Some(hit) = best.get(fragment.id().as_str()) else {
                debug!("No genome hit for fragment {}", fragment.id());
                result.unplaced += 1;
                continue;
            };
            let Some(contig) = self.genome.contig(hit.subject_id()) else {
                warn!(
                    "Fragment {} hit an unknown contig {} of genome {}",
                    fragment.id(),
                    hit.subject_id(),
                    self.genome.id()
                );
                result.unplaced += 1;
                continue;
            };

            let location = hit
                .subject_loc()
                .expanded(self.flank, self.flank, contig.len());
            let dna = String::from_utf8(self.genome.dna(&location)?)?;

            result.placements.push(Placement::new(
                sample_id.to_string(),
                fragment.id().clone(),
                location.clone(),
                *hit.evalue(),
                *hit.pct_identity(),
                hit.query_identity(),
            ));

            let (id, _, _, proteins) = fragment.dissolve();
            result.records.push(gti::Record::new(
                sample_id.to_string(),
                id,
                location,
                dna,
                proteins,
            ));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protmatch_alignment_rs::exact::ExactAligner;
    use protmatch_core_rs::loc::{Location, Strand};
    use protmatch_core_rs::seq;

    const CONTIG: &str = "ttttttttttggggccccaaaattttgggcccaaatttgggcccaaatgcgcgcgcgcatatat";

    fn genome() -> Genome {
        let json = format!(
            r#"{{"id": "1.1", "scientific_name": "Test", "domain": "Bacteria",
                "contigs": [{{"id": "1.1.con.0001", "dna": "{CONTIG}"}}]}}"#
        );
        Genome::from_json(&json).unwrap()
    }

    fn fragment(id: &str, dna: &[u8]) -> Fragment {
        Fragment::new(
            id.to_string(),
            Location::new("rna", 1, dna.len() as u64, Strand::Forward).unwrap(),
            dna.to_vec(),
            vec![format!("M{id}")],
        )
    }

    #[test]
    fn test_relocalize() {
        let genome = genome();
        let parms = Parms::default();
        let relocalizer = Relocalizer::new(ExactAligner, parms, 5, &genome).unwrap();

        // Reverse complement of CONTIG[20..35]
        let reverse = seq::reverse_complement(&CONTIG.as_bytes()[20..35]);
        let fragments = vec![
            fragment("r.rna.0001", &CONTIG.as_bytes()[12..30]),
            fragment("r.rna.0002", b"acgtacgtacgtacgtacgtacgt"),
            fragment("r.rna.0003", &reverse),
            fragment("r.rna.0004", &CONTIG.as_bytes()[..8]),
        ];
        let (records, placements, unplaced) =
            relocalizer.relocalize("S1", fragments).unwrap().dissolve();

        assert_eq!(unplaced, 1);
        assert_eq!(records.len(), 3);
        assert_eq!(placements.len(), 3);

        assert_eq!(records[0].sample_id(), "S1");
        assert_eq!(records[0].fragment_id(), "r.rna.0001");
        assert_eq!(
            *records[0].location(),
            Location::new("1.1.con.0001", 8, 35, Strand::Forward).unwrap()
        );
        assert_eq!(records[0].dna(), &CONTIG[7..35]);
        assert_eq!(*records[0].proteins(), vec!["Mr.rna.0001"]);

        assert_eq!(records[1].fragment_id(), "r.rna.0003");
        assert_eq!(
            *records[1].location(),
            Location::new("1.1.con.0001", 16, 40, Strand::Reverse).unwrap()
        );
        assert_eq!(
            records[1].dna().as_bytes(),
            seq::reverse_complement(&CONTIG.as_bytes()[15..40])
        );

        // Clipped at the contig start
        assert_eq!(*records[2].location().left(), 1);
        assert_eq!(*records[2].location().right(), 13);
        assert_eq!(*placements[2].pct_identity(), 100.0);
    }
}
