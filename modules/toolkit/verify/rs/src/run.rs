use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::{info, warn};
use protmatch_core_rs::parallelism;
use protmatch_io_rs::gti;
use protmatch_io_rs::gto::Genome;
use protmatch_io_rs::WriteRecord;
use rayon::prelude::*;

use crate::config::Config;
use crate::kind::Tally;
use crate::report;
use crate::summary::{self, Summary};
use crate::verifier::{Verification, Verifier};

pub const REPORT: &str = "verify.tsv";
pub const RESULTS: &str = "results.txt";

/// Verify the records of one sample. Genomes outside Bacteria and Archaea are only counted.
pub fn verify_sample(
    sample_id: &str,
    genome: &Genome,
    records: &[gti::Record],
    config: &Config,
) -> Result<(Vec<Verification>, Summary)> {
    let proteins = records.iter().map(|x| x.proteins().len()).sum();

    let (verifications, tally) = if genome.is_prokaryotic() {
        let verifier = Verifier::new(genome, config)?;
        let verifications: Vec<_> = records.iter().flat_map(|x| verifier.verify(x)).collect();
        let tally: Tally = verifications.iter().map(|x| *x.kind()).collect();
        (verifications, Some(tally))
    } else {
        info!(
            "Sample {sample_id}: genome {} is from {}, counting only",
            genome.id(),
            genome.domain()
        );
        (Vec::new(), None)
    };

    let summary = Summary::new(
        sample_id.to_string(),
        genome.id().clone(),
        genome.name().clone(),
        *genome.genetic_code(),
        records.len(),
        proteins,
        tally,
    );
    Ok((verifications, summary))
}

/// Pairs of `<base>.gto` and `<base>.gti` files in a directory, ordered by the base name.
pub fn discover(dir: impl AsRef<Path>) -> Result<Vec<(String, PathBuf, PathBuf)>> {
    let dir = dir.as_ref();
    let mut samples = Vec::new();
    let entries =
        fs::read_dir(dir).wrap_err_with(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        let Some(base) = path
            .file_name()
            .and_then(|x| x.to_str())
            .and_then(|x| x.strip_suffix(".gto"))
        else {
            continue;
        };
        let gti = dir.join(format!("{base}.gti"));
        if gti.is_file() {
            samples.push((base.to_string(), path.clone(), gti));
        } else {
            warn!("No GTI file for genome {}, skipping", path.display());
        }
    }
    samples.sort();
    Ok(samples)
}

/// Verify every sample of a match-run directory, writing the per-protein report and `results.txt`
/// next to the inputs.
pub fn run(dir: impl AsRef<Path>, config: &Config, threads: isize) -> Result<Vec<Summary>> {
    let dir = dir.as_ref();
    let samples = discover(dir)?;
    info!("Found {} samples in {}", samples.len(), dir.display());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism::available(threads)?)
        .build()?;
    let results = pool.install(|| {
        samples
            .par_iter()
            .map(|(sample_id, genome, table)| -> Result<_> {
                let genome = Genome::from_path(genome)?;
                let records = gti::Reader::read_all(table)?;
                verify_sample(sample_id, &genome, &records, config)
                    .wrap_err_with(|| format!("Sample {sample_id} failed"))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut report = report::Writer::from_path(dir.join(REPORT))?;
    let mut totals = summary::Writer::from_path(dir.join(RESULTS))?;
    let mut summaries = Vec::with_capacity(results.len());
    for (verifications, summary) in results {
        report.write_records(&verifications)?;
        totals.write_record(&summary)?;
        summaries.push(summary);
    }
    report.flush()?;
    totals.flush()?;
    info!("Verified {} samples", summaries.len());
    Ok(summaries)
}
