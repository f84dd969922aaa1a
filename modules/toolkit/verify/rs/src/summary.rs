//! Per-sample summary lines of `results.txt`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{Result, WrapErr};
use protmatch_io_rs::WriteRecord;

use crate::kind::{ErrorKind, Tally};

pub const HEADER: &str =
    "sample\tgenome_id\tgenome_name\tgc\trecords\tproteins\tgood\tshorter\tlonger\tchanged\tinvalid";

#[derive(Clone, PartialEq, Eq, Debug, Constructor, Dissolve, Getters)]
pub struct Summary {
    sample_id: String,
    genome_id: String,
    genome_name: String,
    genetic_code: u8,
    records: usize,
    proteins: usize,
    /// Missing for genomes whose proteins were only counted.
    tally: Option<Tally>,
}

pub struct Writer<W> {
    writer: W,
}

impl Writer<()> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Writer<BufWriter<File>>> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("Failed to create summary {}", path.display()))?;
        Writer::new(BufWriter::new(file))
    }
}

impl<W: Write> Writer<W> {
    /// Wrap the output and write the header line.
    pub fn new(mut writer: W) -> Result<Self> {
        writeln!(writer, "{HEADER}")?;
        Ok(Self { writer })
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Summary;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        write!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.sample_id,
            record.genome_id,
            record.genome_name,
            record.genetic_code,
            record.records,
            record.proteins
        )?;
        match &record.tally {
            Some(tally) => writeln!(
                self.writer,
                "\t{}\t{}\t{}\t{}\t{}",
                tally.get(ErrorKind::Exact),
                tally.get(ErrorKind::TooShort),
                tally.get(ErrorKind::TooLong),
                tally.get(ErrorKind::Changed),
                tally.get(ErrorKind::NotFound)
            )?,
            None => writeln!(self.writer, "\t\t\t\t\t")?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
