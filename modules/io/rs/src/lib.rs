pub mod compression;
pub mod fasta;
pub mod gti;
pub mod gto;
mod traits;

pub use traits::{ReadRecord, WriteRecord};
