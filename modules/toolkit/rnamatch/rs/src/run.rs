use std::fs;
use std::path::{Path, PathBuf};

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{ensure, Result, WrapErr};
use itertools::Itertools;
use log::{info, warn};
use protmatch_alignment_rs::{DnaAligner, ProfileSearch};
use protmatch_core_rs::parallelism;
use protmatch_io_rs::gto::Genome;
use protmatch_io_rs::{fasta, gti, WriteRecord};
use rayon::prelude::*;

use crate::engine::Engine;
use crate::hitlog;
use crate::stats::Stats;

const RNA_EXTENSIONS: [&str; 3] = ["fa", "fasta", "fna"];
const GENOME_EXTENSIONS: [&str; 2] = ["gto", "json"];

/// RNA assembly and the genome it was sequenced from, sharing a base name.
#[derive(Clone, PartialEq, Eq, Debug, Constructor, Dissolve, Getters)]
pub struct Sample {
    id: String,
    rna: PathBuf,
    genome: PathBuf,
}

fn rna_base(name: &str) -> Option<&str> {
    let name = name.strip_suffix(".gz").unwrap_or(name);
    let (base, ext) = name.rsplit_once('.')?;
    (!base.is_empty() && RNA_EXTENSIONS.contains(&ext)).then_some(base)
}

/// Samples of a directory: every RNA FASTA file (optionally gzipped) with a genome next to it.
pub fn discover(dir: impl AsRef<Path>) -> Result<Vec<Sample>> {
    let dir = dir.as_ref();
    let mut samples = Vec::new();
    let entries =
        fs::read_dir(dir).wrap_err_with(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(base) = path.file_name().and_then(|x| x.to_str()).and_then(rna_base) else {
            continue;
        };
        let genome = GENOME_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{base}.{ext}")))
            .find(|x| x.is_file());
        match genome {
            Some(genome) => samples.push(Sample::new(base.to_string(), path.clone(), genome)),
            None => warn!("No genome found for {}, skipping", path.display()),
        }
    }
    samples.sort_by(|a, b| a.id.cmp(&b.id));

    let duplicates = samples.iter().map(|x| &x.id).duplicates().join(", ");
    ensure!(
        duplicates.is_empty(),
        "Several RNA files share the base name in {}: {duplicates}",
        dir.display()
    );
    Ok(samples)
}

/// Copy the genome next to the outputs. Nothing is done when both paths name the same file, as
/// happens when the output directory is the input one.
fn copy_genome(genome: &Path, target: &Path) -> Result<()> {
    if target.exists() && fs::canonicalize(genome)? == fs::canonicalize(target)? {
        return Ok(());
    }
    fs::copy(genome, target).wrap_err_with(|| {
        format!(
            "Failed to copy {} to {}",
            genome.display(),
            target.display()
        )
    })?;
    Ok(())
}

/// Run the engine on a single sample and write its outputs into `output`.
pub fn process<P, A>(engine: &Engine<P, A>, sample: &Sample, output: &Path) -> Result<Stats>
where
    P: ProfileSearch,
    A: DnaAligner,
{
    let rna = fasta::Reader::read_all(&sample.rna)?;
    let genome = Genome::from_path(&sample.genome)?;
    let (records, proteins, placements, stats) = engine.run(&sample.id, &rna, &genome)?.dissolve();

    let path = output.join(format!("{}.gti", sample.id));
    let mut writer = gti::Writer::from_path(&path)?;
    writer.write_records(&records)?;
    writer.flush()?;

    copy_genome(&sample.genome, &output.join(format!("{}.gto", sample.id)))?;

    if *engine.config().write_hit_log() {
        let mut writer = hitlog::Writer::from_path(output.join(format!("{}.hits.tsv", sample.id)))?;
        writer.write_records(&placements)?;
        writer.flush()?;
    }
    if *engine.config().write_proteins() {
        let mut writer = fasta::Writer::from_path(output.join(format!("{}.faa", sample.id)))?;
        writer.write_records(&proteins)?;
        writer.flush()?;
    }
    Ok(stats)
}

/// Process every sample of `input` in parallel, one sample per task.
///
/// Returns the statistics of each sample in the order of their ids.
pub fn run<P, A>(
    engine: &Engine<P, A>,
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    threads: isize,
) -> Result<Vec<(String, Stats)>>
where
    P: ProfileSearch + Sync,
    A: DnaAligner + Sync,
{
    let (input, output) = (input.as_ref(), output.as_ref());
    fs::create_dir_all(output)
        .wrap_err_with(|| format!("Failed to create {}", output.display()))?;

    let samples = discover(input)?;
    info!("Found {} samples in {}", samples.len(), input.display());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism::available(threads)?)
        .build()?;
    let results = pool.install(|| {
        samples
            .par_iter()
            .map(|sample| {
                process(engine, sample, output)
                    .map(|stats| (sample.id.clone(), stats))
                    .wrap_err_with(|| format!("Sample {} failed", sample.id))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    let mut total = Stats::default();
    for (_, stats) in &results {
        total += *stats;
    }
    info!("Processed {} samples: {total}", results.len());
    Ok(results)
}
