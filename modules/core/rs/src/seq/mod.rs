pub use dna::{complement, reverse_complement};
pub use gencode::GeneticCode;

mod dna;
mod gencode;
