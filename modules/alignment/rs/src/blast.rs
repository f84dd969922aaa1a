//! BLAST+ command-line adapter.
//!
//! Sequences are written to a scratch directory under positional ids (`s<N>`, `q<N>`) so that arbitrary
//! FASTA labels survive the round trip through `makeblastdb`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use derive_getters::Getters;
use eyre::{ensure, eyre, Result, WrapErr};
use itertools::Itertools;
use log::{debug, info};
use protmatch_core_rs::loc::{Location, Strand};
use protmatch_core_rs::seq::GeneticCode;
use protmatch_io_rs::{fasta, WriteRecord};

use super::{DnaAligner, Hit, Parms, ProfileSearch};

const OUTFMT: &str = "6 qseqid qlen qstart qend sseqid slen sstart send evalue pident bitscore nident length";
const PROFILE_EXTENSION: &str = "smp";

#[derive(Clone, Debug, Getters)]
pub struct Blast {
    /// Directory with the BLAST+ binaries, `PATH` lookup when missing.
    bin_dir: Option<PathBuf>,
    /// Parent directory for scratch files, the system default when missing.
    tmp_dir: Option<PathBuf>,
    threads: usize,
}

impl Default for Blast {
    fn default() -> Self {
        Self::new(None, None, 1)
    }
}

impl Blast {
    pub fn new(bin_dir: Option<PathBuf>, tmp_dir: Option<PathBuf>, threads: usize) -> Self {
        Self {
            bin_dir,
            tmp_dir,
            threads: threads.max(1),
        }
    }

    fn program(&self, name: &str) -> PathBuf {
        match &self.bin_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }

    fn scratch(&self) -> Result<tempfile::TempDir> {
        let builder = tempfile::Builder::new().prefix("protmatch-blast-").to_owned();
        let dir = match &self.tmp_dir {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        };
        dir.wrap_err("Failed to create a scratch directory for BLAST")
    }

    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let path = self.program(program);
        debug!("Running {} {}", path.display(), args.iter().join(" "));
        let output = Command::new(&path)
            .args(args)
            .output()
            .wrap_err_with(|| format!("Failed to run {}", path.display()))?;
        ensure!(
            output.status.success(),
            "{} failed ({}): {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
        Ok(String::from_utf8(output.stdout)?)
    }

    /// Write sequences under positional ids with the given prefix.
    fn write_fasta(records: &[fasta::Record], prefix: &str, path: &Path) -> Result<()> {
        let mut writer = fasta::Writer::from_path(path)?;
        for (ind, record) in records.iter().enumerate() {
            let renamed = fasta::Record::new(format!("{prefix}{ind}"), record.seq().clone())?;
            writer.write_record(&renamed)?;
        }
        writer.flush()
    }

    fn makeblastdb(&self, fasta: &Path, dbtype: &str) -> Result<String> {
        let db = fasta.with_extension("db");
        let db = path_str(&db)?.to_string();
        self.run(
            "makeblastdb",
            &["-in", path_str(fasta)?, "-dbtype", dbtype, "-out", &db],
        )?;
        Ok(db)
    }

    fn parse(
        output: &str,
        queries: impl Fn(usize) -> Result<String>,
        subjects: &[fasta::Record],
    ) -> Result<Vec<Hit>> {
        let mut hits = Vec::new();
        for line in output.lines().filter(|x| !x.trim().is_empty()) {
            let fields: Vec<&str> = line.split('\t').collect();
            ensure!(fields.len() >= 13, "Malformed BLAST output line: {line:?}");

            let index = |field: &str, prefix: char| -> Result<usize> {
                field
                    .strip_prefix(prefix)
                    .and_then(|x| x.parse().ok())
                    .ok_or_else(|| eyre!("Unexpected sequence id in BLAST output: {field}"))
            };
            let num = |ind: usize| -> Result<u64> {
                fields[ind]
                    .parse()
                    .wrap_err_with(|| format!("Invalid BLAST column {ind}: {line:?}"))
            };
            let real = |ind: usize| -> Result<f64> {
                fields[ind]
                    .parse()
                    .wrap_err_with(|| format!("Invalid BLAST column {ind}: {line:?}"))
            };

            let query_id = queries(index(fields[0], 'q')?)?;
            let subject = subjects
                .get(index(fields[4], 's')?)
                .ok_or_else(|| eyre!("Unknown subject in BLAST output: {line:?}"))?;

            let (sstart, send) = (num(6)?, num(7)?);
            let (left, right, strand) = if sstart <= send {
                (sstart, send, Strand::Forward)
            } else {
                (send, sstart, Strand::Reverse)
            };

            hits.push(Hit::new(
                num(1)?,
                Location::new(query_id, num(2)?, num(3)?, Strand::Forward)?,
                num(5)?,
                Location::new(subject.label(), left, right, strand)?,
                subject.id().clone(),
                real(8)?,
                real(9)?,
                real(10)?,
                num(11)?,
                num(12)?,
            ));
        }
        Ok(hits)
    }
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| eyre!("Non UTF-8 path: {}", path.display()))
}

impl DnaAligner for Blast {
    fn align(
        &self,
        queries: &[fasta::Record],
        subjects: &[fasta::Record],
        parms: &Parms,
    ) -> Result<Vec<Hit>> {
        if queries.is_empty() || subjects.is_empty() {
            return Ok(Vec::new());
        }
        let scratch = self.scratch()?;
        let qpath = scratch.path().join("queries.fna");
        let spath = scratch.path().join("subjects.fna");
        Self::write_fasta(queries, "q", &qpath)?;
        Self::write_fasta(subjects, "s", &spath)?;
        let db = self.makeblastdb(&spath, "nucl")?;

        let (evalue, threads) = (parms.max_evalue().to_string(), self.threads.to_string());
        let output = self.run(
            "blastn",
            &[
                "-query",
                path_str(&qpath)?,
                "-db",
                &db,
                "-evalue",
                &evalue,
                "-num_threads",
                &threads,
                "-outfmt",
                OUTFMT,
            ],
        )?;

        let hits = Self::parse(
            &output,
            |ind| {
                let query = queries
                    .get(ind)
                    .ok_or_else(|| eyre!("Unknown query #{ind} in BLAST output"))?;
                Ok(query.label().to_string())
            },
            subjects,
        )?;
        Ok(parms.filter(hits))
    }
}

/// A directory of BLAST PSSM profiles (`*.smp`), one per protein family. The profile id is the file stem.
#[derive(Clone, Debug, Getters)]
pub struct ProfileDir {
    blast: Blast,
    profiles: Vec<(String, PathBuf)>,
}

impl ProfileDir {
    pub fn new(dir: impl AsRef<Path>, blast: Blast) -> Result<Self> {
        let dir = dir.as_ref();
        ensure!(dir.is_dir(), "Profile directory {} not found or invalid", dir.display());

        let mut profiles = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|x| x.to_str()) != Some(PROFILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|x| x.to_str()) else {
                continue;
            };
            profiles.push((stem.to_string(), path.clone()));
        }
        profiles.sort();
        ensure!(
            !profiles.is_empty(),
            "No *.{PROFILE_EXTENSION} profiles found in {}",
            dir.display()
        );
        info!("{} protein profiles found in {}", profiles.len(), dir.display());

        Ok(Self { blast, profiles })
    }
}

impl ProfileSearch for ProfileDir {
    fn profile(
        &self,
        sequences: &[fasta::Record],
        code: &GeneticCode,
        parms: &Parms,
    ) -> Result<Vec<Hit>> {
        if sequences.is_empty() {
            return Ok(Vec::new());
        }
        let scratch = self.blast.scratch()?;
        let spath = scratch.path().join("sequences.fna");
        Blast::write_fasta(sequences, "s", &spath)?;
        let db = self.blast.makeblastdb(&spath, "nucl")?;

        let evalue = parms.max_evalue().to_string();
        let threads = self.blast.threads.to_string();
        let gencode = code.id().to_string();

        let mut hits = Vec::new();
        for (id, path) in &self.profiles {
            let output = self.blast.run(
                "tblastn",
                &[
                    "-in_pssm",
                    path_str(path)?,
                    "-db",
                    &db,
                    "-db_gencode",
                    &gencode,
                    "-evalue",
                    &evalue,
                    "-num_threads",
                    &threads,
                    "-outfmt",
                    OUTFMT,
                ],
            )?;
            // PSSM queries are reported under arbitrary ids, every line belongs to the current profile
            let parsed = Self::parse_profile_output(&output, id, sequences)?;
            debug!("Profile {id}: {} raw hits", parsed.len());
            hits.extend(parsed);
        }
        Ok(parms.filter(hits))
    }
}

impl ProfileDir {
    fn parse_profile_output(
        output: &str,
        id: &str,
        sequences: &[fasta::Record],
    ) -> Result<Vec<Hit>> {
        let normalized = output
            .lines()
            .filter(|x| !x.trim().is_empty())
            .map(|line| match line.split_once('\t') {
                Some((_, rest)) => format!("q0\t{rest}"),
                None => line.to_string(),
            })
            .join("\n");
        Blast::parse(&normalized, |_| Ok(id.to_string()), sequences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects() -> Vec<fasta::Record> {
        vec![
            ("TRINITY_1 len=500", "ACGT").try_into().unwrap(),
            ("TRINITY_2", "ACGT").try_into().unwrap(),
        ]
    }

    #[test]
    fn test_parse_blastn_output() -> Result<()> {
        let queries: Vec<fasta::Record> = vec![("r.TRINITY_1.0001 ctg_1+100", "ACGT").try_into()?];
        let output = "q0\t300\t1\t300\ts1\t5000\t1300\t1001\t1e-150\t99.33\t540\t298\t300\n\n";
        let hits = Blast::parse(
            output,
            |ind| Ok(queries[ind].label().to_string()),
            &subjects(),
        )?;

        assert_eq!(hits.len(), 1);
        let hit = &hits[0];
        assert_eq!(hit.query_id(), "r.TRINITY_1.0001");
        assert_eq!(hit.subject_loc(), &Location::new("TRINITY_2", 1001, 1300, Strand::Reverse)?);
        assert_eq!(*hit.subject_len(), 5000);
        assert_eq!(*hit.evalue(), 1e-150);
        assert_eq!(*hit.n_ident(), 298);
        assert_eq!(*hit.align_len(), 300);
        Ok(())
    }

    #[test]
    fn test_parse_profile_output() -> Result<()> {
        let output = "Query_1\t120\t5\t118\ts0\t500\t31\t372\t1e-40\t55.2\t150.5\t63\t114\n";
        let hits = ProfileDir::parse_profile_output(output, "RecA", &subjects())?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].query_id(), "RecA");
        assert_eq!(hits[0].subject_def(), "TRINITY_1 len=500");
        assert_eq!(hits[0].subject_loc(), &Location::new("TRINITY_1", 31, 372, Strand::Forward)?);
        Ok(())
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let parse = |output: &str| Blast::parse(output, |_| Ok("q".to_string()), &subjects());
        assert!(parse("q0\t300\t1").is_err());
        assert!(parse("q0\t300\t1\t300\tx1\t5000\t1300\t1001\t1e-150\t99.33\t540\t298\t300").is_err());
        assert!(parse("q0\t300\t1\t300\ts7\t5000\t1300\t1001\t1e-150\t99.33\t540\t298\t300").is_err());
        assert!(parse("q0\tNaN\t1\t300\ts1\t5000\t1300\t1001\t1e-150\t99.33\t540\t298\t300").is_err());
    }

    #[test]
    fn test_default_runs_one_thread() {
        let blast = Blast::default();
        assert_eq!(*blast.threads(), 1);
        assert!(blast.bin_dir().is_none());
        assert_eq!(*Blast::new(None, None, 0).threads(), 1);
    }

    #[test]
    fn test_profile_dir() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(ProfileDir::new(dir.path(), Blast::default()).is_err());

        for name in ["RecA.smp", "AcrB.smp", "notes.txt"] {
            fs::write(dir.path().join(name), "")?;
        }
        let profiles = ProfileDir::new(dir.path(), Blast::default())?;
        let ids: Vec<_> = profiles.profiles().iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["AcrB", "RecA"]);
        Ok(())
    }
}
