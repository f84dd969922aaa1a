//! Per-protein verification report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use eyre::{Result, WrapErr};
use protmatch_io_rs::WriteRecord;

use crate::verifier::Verification;

pub const HEADER: &str = "sample\tprot_id\trna_id\tlocation\tbest_peg\tdistance\tnotes\tORF";

pub struct Writer<W> {
    writer: W,
}

impl Writer<()> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Writer<BufWriter<File>>> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("Failed to create report {}", path.display()))?;
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
    type Record = Verification;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}\t{:.4}\t{}\t{}",
            record.sample_id(),
            record.protein_id(),
            record.fragment_id(),
            record.location(),
            record.best_feature().as_deref().unwrap_or_default(),
            record.distance(),
            record.note(),
            record
                .orf()
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default()
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
