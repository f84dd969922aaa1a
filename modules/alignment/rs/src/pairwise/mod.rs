//! Global pairwise comparison of protein sequences.

pub use edits::{edit_script, Edits};
pub use op::Op;

mod edits;
mod op;
