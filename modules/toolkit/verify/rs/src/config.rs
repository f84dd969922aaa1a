use derive_getters::Getters;
use eyre::{ensure, Result};

#[derive(Clone, PartialEq, Eq, Debug, Getters)]
pub struct Config {
    /// Length of the protein k-mers used to find the closest annotated protein.
    kmer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { kmer_size: 8 }
    }
}

impl Config {
    pub fn set_kmer_size(&mut self, kmer_size: usize) -> Result<&mut Self> {
        ensure!(kmer_size >= 1, "K-mer size must be at least 1");
        self.kmer_size = kmer_size;
        Ok(self)
    }
}
