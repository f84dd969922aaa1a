use eyre::{bail, Result};

const STANDARD: &[u8; 64] = b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const MYCOPLASMA: &[u8; 64] = b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
const GRACILIBACTERIA: &[u8; 64] = b"FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";

/// NCBI translation table restricted to the prokaryotic codes (1, 4, 11 and 25).
///
/// Codons are indexed in TCAG order. Start codons are ATG, GTG and TTG in every table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GeneticCode {
    id: u8,
    table: &'static [u8; 64],
}

impl GeneticCode {
    pub fn new(id: u8) -> Result<Self> {
        let table = match id {
            1 | 11 => STANDARD,
            4 => MYCOPLASMA,
            25 => GRACILIBACTERIA,
            _ => bail!("Unsupported genetic code: {id}"),
        };
        Ok(Self { id, table })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    fn index(codon: &[u8]) -> Option<usize> {
        if codon.len() != 3 {
            return None;
        }
        codon.iter().try_fold(0, |acc, base| {
            let ind = match base.to_ascii_lowercase() {
                b't' | b'u' => 0,
                b'c' => 1,
                b'a' => 2,
                b'g' => 3,
                _ => return None,
            };
            Some(acc * 4 + ind)
        })
    }

    pub fn is_start(&self, codon: &[u8]) -> bool {
        codon.len() == 3
            && codon[1..].eq_ignore_ascii_case(b"tg")
            && matches!(codon[0].to_ascii_lowercase(), b'a' | b'g' | b't' | b'u')
    }

    pub fn is_stop(&self, codon: &[u8]) -> bool {
        Self::index(codon).is_some_and(|ind| self.table[ind] == b'*')
    }

    /// Amino acid for a single codon, `X` for ambiguous or incomplete codons.
    pub fn translate_codon(&self, codon: &[u8]) -> u8 {
        Self::index(codon).map_or(b'X', |ind| self.table[ind])
    }

    /// Translate `len` bases starting at the 1-based position `left`.
    ///
    /// A leading start codon is always read as methionine and a trailing partial codon is ignored.
    pub fn translate(&self, seq: &[u8], left: usize, len: usize) -> String {
        let start = left.saturating_sub(1).min(seq.len());
        let end = (start + len).min(seq.len());
        let mut protein = String::with_capacity((end - start) / 3);
        for (ind, codon) in seq[start..end].chunks_exact(3).enumerate() {
            let aa = if ind == 0 && self.is_start(codon) {
                b'M'
            } else {
                self.translate_codon(codon)
            };
            protein.push(aa as char);
        }
        protein
    }
}
