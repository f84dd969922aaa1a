use derive_getters::Getters;
use eyre::{eyre, Result};
use protmatch_alignment_rs::Parms;

use crate::orf::StartStrategy;

/// Tunable parameters of the matching pipeline.
///
/// Every setter validates its argument, so a `Config` is always ready to use.
#[derive(Clone, PartialEq, Debug, Getters)]
pub struct Config {
    /// Number of fragments collected before a genome relocalization round.
    batch_size: usize,
    /// Bases added on both sides of a relocalized fragment.
    flank: u64,
    /// Loci closer than this are merged into a single operon.
    max_gap: u64,
    max_evalue: f64,
    /// Minimum % of a fragment covered by its genome hit.
    genome_min_query_coverage: f64,
    /// Minimum % identity of a genome hit.
    genome_min_identity: f64,
    /// Minimum % of a profile covered by its RNA hit.
    profile_min_query_coverage: f64,
    profile_min_query_bit_score: f64,
    profile_min_query_identity: f64,
    start: StartStrategy,
    write_hit_log: bool,
    write_proteins: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            batch_size: 10,
            flank: 50,
            max_gap: 500,
            max_evalue: 1e-10,
            genome_min_query_coverage: 95.0,
            genome_min_identity: 90.0,
            profile_min_query_coverage: 65.0,
            profile_min_query_bit_score: 1.1,
            profile_min_query_identity: 0.0,
            start: StartStrategy::Nearest,
            write_hit_log: false,
            write_proteins: false,
        }
    }
}

fn percent(name: &str, value: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&value) {
        return Err(eyre!("{name} must be between 0 and 100, got {value}"));
    }
    Ok(value)
}

impl Config {
    pub fn set_batch_size(&mut self, batch_size: usize) -> Result<&mut Self> {
        if batch_size < 1 {
            return Err(eyre!("Batch size must be at least 1"));
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    pub fn set_flank(&mut self, flank: u64) -> &mut Self {
        self.flank = flank;
        self
    }

    pub fn set_max_gap(&mut self, max_gap: u64) -> &mut Self {
        self.max_gap = max_gap;
        self
    }

    pub fn set_max_evalue(&mut self, max_evalue: f64) -> Result<&mut Self> {
        if !(0.0..1.0).contains(&max_evalue) {
            return Err(eyre!("Maximum e-value must be in [0, 1), got {max_evalue}"));
        }
        self.max_evalue = max_evalue;
        Ok(self)
    }

    pub fn set_genome_min_query_coverage(&mut self, value: f64) -> Result<&mut Self> {
        self.genome_min_query_coverage = percent("Minimum fragment coverage", value)?;
        Ok(self)
    }

    pub fn set_genome_min_identity(&mut self, value: f64) -> Result<&mut Self> {
        self.genome_min_identity = percent("Minimum genome identity", value)?;
        Ok(self)
    }

    pub fn set_profile_min_query_coverage(&mut self, value: f64) -> Result<&mut Self> {
        self.profile_min_query_coverage = percent("Minimum profile coverage", value)?;
        Ok(self)
    }

    pub fn set_profile_min_query_bit_score(&mut self, value: f64) -> Result<&mut Self> {
        if !(0.0..=10.0).contains(&value) {
            return Err(eyre!(
                "Minimum query-scaled bit score must be between 0 and 10, got {value}"
            ));
        }
        self.profile_min_query_bit_score = value;
        Ok(self)
    }

    pub fn set_profile_min_query_identity(&mut self, value: f64) -> Result<&mut Self> {
        if !(0.0..=1.0).contains(&value) {
            return Err(eyre!(
                "Minimum query identity fraction must be between 0 and 1, got {value}"
            ));
        }
        self.profile_min_query_identity = value;
        Ok(self)
    }

    pub fn set_start(&mut self, start: StartStrategy) -> &mut Self {
        self.start = start;
        self
    }

    pub fn set_write_hit_log(&mut self, write_hit_log: bool) -> &mut Self {
        self.write_hit_log = write_hit_log;
        self
    }

    pub fn set_write_proteins(&mut self, write_proteins: bool) -> &mut Self {
        self.write_proteins = write_proteins;
        self
    }

    /// Filters applied to profile hits against the RNA sequences.
    pub fn profile_parms(&self) -> Result<Parms> {
        let mut parms = Parms::default();
        parms
            .set_max_evalue(self.max_evalue)?
            .set_min_query_coverage(self.profile_min_query_coverage)?
            .set_min_query_bit_score(self.profile_min_query_bit_score)?
            .set_min_query_identity(self.profile_min_query_identity)?;
        Ok(parms)
    }

    /// Filters applied to fragment hits against the genome contigs.
    pub fn genome_parms(&self) -> Result<Parms> {
        let mut parms = Parms::default();
        parms
            .set_max_evalue(self.max_evalue)?
            .set_min_query_coverage(self.genome_min_query_coverage)?
            .set_min_pct_identity(self.genome_min_identity)?;
        Ok(parms)
    }
}
