//! Extension of profile hits to complete open reading frames.

pub use start::{Biased, Candidate, Longest, Nearest, StartPicker, StartStrategy};

use protmatch_core_rs::loc::{Location, Strand};
use protmatch_core_rs::seq::GeneticCode;

mod start;

/// Turns forward-strand hits into reading frames and translates them.
pub trait OrfExtender {
    /// Reading frame from a start codon to a stop codon (inclusive) containing the first codon of
    /// the hit, or `None` if the hit can't be extended.
    fn extend(&self, hit: &Location, seq: &[u8]) -> Option<Location>;

    /// Protein encoded by `len` bases starting at the 1-based `left`.
    fn translate(&self, seq: &[u8], left: u64, len: u64) -> String;

    /// Protein of a reading frame without its stop codon.
    fn protein(&self, orf: &Location, seq: &[u8]) -> String {
        self.translate(seq, *orf.left(), orf.len().saturating_sub(3))
    }
}

/// Codon scanner anchored at the left edge of the hit.
#[derive(Clone, Copy)]
pub struct OrfFinder {
    code: GeneticCode,
    picker: &'static (dyn StartPicker + Send + Sync),
}

impl OrfFinder {
    pub fn new(code: GeneticCode, strategy: StartStrategy) -> Self {
        Self {
            code,
            picker: strategy.picker(),
        }
    }

    pub fn code(&self) -> &GeneticCode {
        &self.code
    }

    fn codon(seq: &[u8], pos: u64) -> &[u8] {
        &seq[pos as usize - 1..pos as usize + 2]
    }

    fn stop_after(&self, seq: &[u8], mut pos: u64) -> Option<u64> {
        let seq_len = seq.len() as u64;
        while pos + 2 <= seq_len {
            if self.code.is_stop(Self::codon(seq, pos)) {
                return Some(pos + 2);
            }
            pos += 3;
        }
        None
    }

    fn starts_before(&self, seq: &[u8], mut pos: u64) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        loop {
            let codon = Self::codon(seq, pos);
            if self.code.is_stop(codon) {
                break;
            }
            if self.code.is_start(codon) {
                let first = match codon[0].to_ascii_lowercase() {
                    b'u' => b't',
                    x => x,
                };
                candidates.push(Candidate::new(pos, first));
            }
            if pos < 4 {
                break;
            }
            pos -= 3;
        }
        candidates
    }
}

impl OrfExtender for OrfFinder {
    fn extend(&self, hit: &Location, seq: &[u8]) -> Option<Location> {
        let codons = hit.len() / 3;
        if codons == 0 || *hit.right() > seq.len() as u64 {
            return None;
        }
        let right = self.stop_after(seq, hit.left() + 3 * (codons - 1))?;
        let candidates = self.starts_before(seq, *hit.left());
        let left = self.picker.pick(&candidates)?;
        Location::new(hit.contig().clone(), left, right, Strand::Forward).ok()
    }

    fn translate(&self, seq: &[u8], left: u64, len: u64) -> String {
        self.code.translate(seq, left as usize, len as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQ: &[u8] = b"ccctaagccatggccgtgaaaccctgagg";

    fn hit(left: u64, right: u64) -> Location {
        Location::new("rna", left, right, Strand::Forward).unwrap()
    }

    fn finder(strategy: StartStrategy) -> OrfFinder {
        OrfFinder::new(GeneticCode::new(11).unwrap(), strategy)
    }

    #[test]
    fn test_extend_by_strategy() {
        for (strategy, left, protein) in [
            (StartStrategy::Nearest, 16, "MKP"),
            (StartStrategy::Longest, 10, "MAVKP"),
            (StartStrategy::Biased, 10, "MAVKP"),
        ] {
            let finder = finder(strategy);
            let orf = finder.extend(&hit(19, 24), SEQ).unwrap();
            assert_eq!(orf, hit(left, 27), "{strategy}");
            assert_eq!(finder.protein(&orf, SEQ), protein, "{strategy}");
        }
    }

    #[test]
    fn test_partial_codons_are_trimmed() {
        let orf = finder(StartStrategy::Nearest).extend(&hit(19, 23), SEQ);
        assert_eq!(orf, Some(hit(16, 27)));
    }

    #[test]
    fn test_extension_failures() {
        let finder = finder(StartStrategy::Nearest);
        // Shorter than a codon
        assert_eq!(finder.extend(&hit(19, 20), SEQ), None);
        // No stop codon downstream
        assert_eq!(finder.extend(&hit(19, 24), &SEQ[..24]), None);
        // The first codon is a stop, no start upstream
        assert_eq!(finder.extend(&hit(4, 9), SEQ), None);
        // Outside of the sequence
        assert_eq!(finder.extend(&hit(19, 40), SEQ), None);
    }
}
