use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::Result;
use protmatch_core_rs::loc::Location;
use protmatch_io_rs::fasta;

use crate::operon::Locus;

/// Piece of an RNA sequence covering one operon.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Fragment {
    id: String,
    /// Location on the RNA sequence as it was read.
    loc: Location,
    /// Bases in the working orientation, coding on the forward strand.
    dna: Vec<u8>,
    proteins: Vec<String>,
}

impl Fragment {
    /// FASTA record labelled with the fragment id, the comment holds the RNA location.
    pub fn to_fasta(&self) -> Result<fasta::Record> {
        fasta::Record::new(format!("{} {}", self.id, self.loc), self.dna.clone())
    }
}

pub fn fragment_id(sequence: &str, counter: usize) -> String {
    format!("r.{sequence}.{counter:04}")
}

/// Cut the loci out of the working sequence. Numbering restarts at 1 for every sequence.
///
/// `original` maps a location of the working sequence back onto the RNA sequence as it was read.
pub fn emit(
    sequence: &str,
    seq: &[u8],
    original: impl Fn(&Location) -> Result<Location>,
    loci: Vec<Locus>,
) -> Result<Vec<Fragment>> {
    loci.into_iter()
        .enumerate()
        .map(|(ind, locus)| {
            let (loc, proteins) = locus.dissolve();
            let dna = loc.dna(seq)?;
            Ok(Fragment::new(
                fragment_id(sequence, ind + 1),
                original(&loc)?,
                dna,
                proteins,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use protmatch_core_rs::loc::Strand;

    #[test]
    fn test_emit() {
        let seq = b"aaaacccccgggggttttt";
        let loci = vec![
            Locus::new(
                Location::new("rna", 5, 9, Strand::Forward).unwrap(),
                vec!["MA".to_string()],
            ),
            Locus::new(
                Location::new("rna", 10, 19, Strand::Forward).unwrap(),
                vec!["MB".to_string(), "MC".to_string()],
            ),
        ];
        let fragments = emit("TRINITY_1", seq, |x| Ok(x.clone()), loci).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].id(), "r.TRINITY_1.0001");
        assert_eq!(fragments[0].dna(), b"ccccc");
        assert_eq!(fragments[1].id(), "r.TRINITY_1.0002");
        assert_eq!(fragments[1].dna(), b"gggggttttt");
        assert_eq!(*fragments[1].proteins(), vec!["MB", "MC"]);

        let record = fragments[1].to_fasta().unwrap();
        assert_eq!(record.label(), "r.TRINITY_1.0002");
        assert_eq!(record.comment(), "rna_10+10");
    }

    #[test]
    fn test_emit_reversed() {
        // Working orientation of a reverse complemented sequence
        let seq = b"aaaacccccgggggttttt";
        let loci = vec![Locus::new(
            Location::new("rna", 5, 9, Strand::Forward).unwrap(),
            vec!["MA".to_string()],
        )];
        let fragments = emit("TRINITY_1", seq, |x| x.converse(19), loci).unwrap();
        assert_eq!(fragments[0].dna(), b"ccccc");
        assert_eq!(
            *fragments[0].loc(),
            Location::new("rna", 11, 15, Strand::Reverse).unwrap()
        );

        let record = fragments[0].to_fasta().unwrap();
        assert_eq!(record.comment(), "rna_15-5");
        assert_eq!(record.seq(), b"ccccc");
    }

    #[test]
    fn test_counter_width() {
        assert_eq!(fragment_id("x", 12), "r.x.0012");
        assert_eq!(fragment_id("x", 12345), "r.x.12345");
    }
}
