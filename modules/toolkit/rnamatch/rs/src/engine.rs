use ahash::{AHashMap, AHashSet};
use derive_getters::{Dissolve, Getters};
use eyre::{Result, WrapErr};
use log::{debug, info, warn};
use protmatch_alignment_rs::{DnaAligner, Hit, ProfileSearch};
use protmatch_core_rs::seq::GeneticCode;
use protmatch_io_rs::gto::Genome;
use protmatch_io_rs::{fasta, gti};

use crate::config::Config;
use crate::consolidate::consolidate;
use crate::fragment::{self, Fragment};
use crate::hitlog::Placement;
use crate::operon::OperonAssembler;
use crate::orf::{OrfExtender, OrfFinder};
use crate::relocalize::Relocalizer;
use crate::resolve::resolve;
use crate::stats::Stats;

/// Everything produced for a single sample.
#[derive(Clone, PartialEq, Debug, Default, Dissolve, Getters)]
pub struct Harvest {
    records: Vec<gti::Record>,
    /// Translated proteins, only collected when requested by the config.
    proteins: Vec<fasta::Record>,
    placements: Vec<Placement>,
    stats: Stats,
}

/// Per-sample pipeline: profile search, reading frames, operons and genome relocalization.
///
/// Sequences are processed one at a time; their fragments are relocalized in batches.
pub struct Engine<P, A> {
    config: Config,
    profiler: P,
    aligner: A,
}

impl<P: ProfileSearch, A: DnaAligner> Engine<P, A> {
    pub fn new(config: Config, profiler: P, aligner: A) -> Self {
        Self {
            config,
            profiler,
            aligner,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&self, sample_id: &str, rna: &[fasta::Record], genome: &Genome) -> Result<Harvest> {
        let code = GeneticCode::new(*genome.genetic_code())
            .wrap_err_with(|| format!("Genome {} can't be translated", genome.id()))?;
        let finder = OrfFinder::new(code, *self.config.start());
        let relocalizer = Relocalizer::new(
            &self.aligner,
            self.config.genome_parms()?,
            *self.config.flank(),
            genome,
        )?;

        info!(
            "Sample {sample_id}: profiling {} sequences against genome {} ({})",
            rna.len(),
            genome.id(),
            genome.name()
        );
        let hits = self
            .profiler
            .profile(rna, &code, &self.config.profile_parms()?)?;

        let mut by_sequence: AHashMap<&str, Vec<&Hit>> = AHashMap::new();
        for hit in &hits {
            by_sequence.entry(hit.subject_id()).or_default().push(hit);
        }
        let labels: AHashSet<&str> = rna.iter().map(fasta::Record::label).collect();
        for unknown in by_sequence.keys().filter(|x| !labels.contains(*x)) {
            warn!("Sample {sample_id}: profile hits on an unknown sequence {unknown}");
        }

        let mut harvest = Harvest::default();
        harvest.stats.sequences = rna.len();

        let mut batch = Vec::new();
        for record in rna {
            let Some(hits) = by_sequence.get(record.label()) else {
                continue;
            };
            harvest.stats.sequences_with_hits += 1;
            if batch.len() >= *self.config.batch_size() {
                self.relocalize(&relocalizer, sample_id, &mut batch, &mut harvest)?;
            }
            let fragments = self
                .fragments(record, hits, &finder, &mut harvest)
                .wrap_err_with(|| format!("Failed to process sequence {}", record.label()))?;
            batch.extend(fragments);
        }
        if !batch.is_empty() {
            self.relocalize(&relocalizer, sample_id, &mut batch, &mut harvest)?;
        }

        info!("Sample {sample_id}: {}", harvest.stats);
        Ok(harvest)
    }

    /// Fragments of a single RNA sequence with their proteins.
    fn fragments(
        &self,
        record: &fasta::Record,
        hits: &[&Hit],
        finder: &OrfFinder,
        harvest: &mut Harvest,
    ) -> Result<Vec<Fragment>> {
        let stats = &mut harvest.stats;
        let consolidated = consolidate(record.seq(), hits.iter().copied())?;
        stats.profile_hits += hits.len();
        stats.wrong_strand += consolidated.dropped();

        let seq = consolidated.seq();
        let mut orfs = Vec::with_capacity(consolidated.hits().len());
        for hit in consolidated.hits() {
            match finder.extend(hit.loc(), seq) {
                Some(orf) => orfs.push(orf),
                None => {
                    debug!(
                        "Hit of {} at {} has no reading frame",
                        hit.profile_id(),
                        hit.loc()
                    );
                    stats.extension_failures += 1;
                }
            }
        }
        let (orfs, redundant) = resolve(orfs);
        stats.redundant += redundant;

        let mut assembler = OperonAssembler::new(*self.config.max_gap());
        for orf in orfs {
            let protein = finder.protein(&orf, seq);
            if protein.contains('*') {
                debug!("Reading frame {orf} has an internal stop");
                stats.internal_stops += 1;
                continue;
            }
            stats.proteins += 1;
            if *self.config.write_proteins() {
                let id = format!(
                    "p.{:09} {}",
                    stats.proteins,
                    consolidated.original(&orf)?
                );
                harvest
                    .proteins
                    .push(fasta::Record::new(id, protein.clone().into_bytes())?);
            }
            stats.merges += assembler.add(orf, protein);
        }
        debug!(
            "Sequence {}: {} loci from {} hits",
            record.label(),
            assembler.len(),
            hits.len()
        );

        let fragments = fragment::emit(
            record.label(),
            seq,
            |loc| consolidated.original(loc),
            assembler.finish(),
        )?;
        stats.fragments += fragments.len();
        Ok(fragments)
    }

    fn relocalize(
        &self,
        relocalizer: &Relocalizer<&A>,
        sample_id: &str,
        batch: &mut Vec<Fragment>,
        harvest: &mut Harvest,
    ) -> Result<()> {
        info!(
            "Sample {sample_id}: relocalizing a batch of {} fragments",
            batch.len()
        );
        let (records, placements, unplaced) = relocalizer
            .relocalize(sample_id, std::mem::take(batch))?
            .dissolve();

        let stats = &mut harvest.stats;
        stats.batches += 1;
        stats.unplaced += unplaced;
        stats.records += records.len();
        harvest.records.extend(records);
        harvest.placements.extend(placements);
        Ok(())
    }
}
