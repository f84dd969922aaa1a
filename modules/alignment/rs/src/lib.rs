pub use hit::Hit;
pub use parms::Parms;
pub use traits::{DnaAligner, ProfileSearch};

pub mod blast;
pub mod exact;
mod hit;
pub mod pairwise;
mod parms;
mod traits;
