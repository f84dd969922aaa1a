pub use config::Config;
pub use engine::{Engine, Harvest};
pub use run::{discover, process, run, Sample};
pub use stats::Stats;

mod config;
pub mod consolidate;
mod engine;
pub mod fragment;
pub mod hitlog;
pub mod operon;
pub mod orf;
pub mod relocalize;
pub mod resolve;
mod run;
mod stats;
