pub use config::Config;
pub use kind::{ErrorKind, Tally};
pub use run::{discover, run, verify_sample, REPORT, RESULTS};
pub use summary::Summary;
pub use verifier::{Verification, Verifier};

mod config;
mod kind;
pub mod report;
mod run;
pub mod summary;
pub mod verifier;
