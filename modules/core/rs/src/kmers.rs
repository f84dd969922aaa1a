use ahash::AHashSet;
use derive_getters::Getters;

/// Set of the distinct k-mers of a protein, used to estimate similarity between proteins.
#[derive(Clone, Debug, Getters)]
pub struct ProteinKmers {
    protein: String,
    k: usize,
    #[getter(skip)]
    kmers: AHashSet<Box<[u8]>>,
}

impl ProteinKmers {
    pub fn new(protein: impl Into<String>, k: usize) -> Self {
        let protein = protein.into();
        let k = k.max(1);
        let kmers = protein
            .as_bytes()
            .windows(k)
            .map(|kmer| kmer.to_ascii_uppercase().into_boxed_slice())
            .collect();
        Self { protein, k, kmers }
    }

    /// Number of distinct k-mers.
    pub fn size(&self) -> usize {
        self.kmers.len()
    }

    pub fn similarity(&self, other: &Self) -> usize {
        let (small, large) = if self.kmers.len() <= other.kmers.len() {
            (&self.kmers, &other.kmers)
        } else {
            (&other.kmers, &self.kmers)
        };
        small.iter().filter(|kmer| large.contains(*kmer)).count()
    }

    /// Jaccard distance between k-mer sets: 0 for identical proteins, 1 for nothing in common.
    pub fn distance(&self, other: &Self) -> f64 {
        if self.protein.eq_ignore_ascii_case(&other.protein) {
            return 0.0;
        }
        let common = self.similarity(other);
        let union = self.size() + other.size() - common;
        if union == 0 {
            1.0
        } else {
            1.0 - common as f64 / union as f64
        }
    }
}
