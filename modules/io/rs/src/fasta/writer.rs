use std::fs::File;
use std::io::{BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::Path;

use derive_getters::Dissolve;
use eyre::{Result, WrapErr};

use super::record::Record;
use crate::traits::WriteRecord;

/// Line width used by the FASTA files produced in this workspace.
pub const DEFAULT_LINE_WIDTH: usize = 60;

#[derive(Debug, Clone, Eq, PartialEq, Dissolve)]
pub struct Writer<W> {
    writer: W,
    line_width: NonZeroUsize,
}

impl<W> Writer<W> {
    pub fn new(writer: W, line_width: NonZeroUsize) -> Self {
        Self { writer, line_width }
    }
}

impl Writer<()> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Writer<BufWriter<File>>> {
        let path = path.as_ref();
        let file =
            File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;
        let width = NonZeroUsize::new(DEFAULT_LINE_WIDTH).unwrap_or(NonZeroUsize::MIN);
        Ok(Writer::new(BufWriter::new(file), width))
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        self.writer.write_all(b">")?;
        self.writer.write_all(record.id().as_bytes())?;
        self.writer.write_all(b"\n")?;

        record
            .seq()
            .chunks(self.line_width.get())
            .try_for_each(|c| -> Result<()> {
                self.writer.write_all(c)?;
                self.writer.write_all(b"\n")?;
                Ok(())
            })
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fasta::Reader;
    use crate::ReadRecord;
    use std::io::Cursor;

    #[test]
    fn test_line_wrapping() -> Result<()> {
        let records: Vec<Record> = vec![
            ("first fragment", "ACGTACGTAC").try_into()?,
            ("second", "ACG").try_into()?,
        ];

        let mut produced = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut produced), NonZeroUsize::new(4).unwrap());
        writer.write_records(&records)?;
        writer.flush()?;

        let produced = String::from_utf8(produced)?;
        assert_eq!(produced, ">first fragment\nACGT\nACGT\nAC\n>second\nACG\n");

        let mut parsed = Vec::new();
        Reader::new(Cursor::new(produced.as_bytes()))?.read_to_end(&mut parsed)?;
        assert_eq!(parsed, records);
        Ok(())
    }

    #[test]
    fn test_from_path() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("out.fa");
        let record: Record = ("id", "MKV").try_into()?;

        let mut writer = Writer::from_path(&path)?;
        writer.write_record(&record)?;
        writer.flush()?;
        drop(writer);

        assert_eq!(Reader::read_all(&path)?, vec![record]);
        Ok(())
    }
}
