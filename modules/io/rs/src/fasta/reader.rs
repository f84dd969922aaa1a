use std::io::BufRead;
use std::path::Path;

use derive_getters::Dissolve;
use eyre::{ensure, Result, WrapErr};

use super::record::Record;
use crate::compression;
use crate::traits::ReadRecord;

/// A strict FASTA reader that reads a single record at a time. Ignores:
/// - Carriage return characters at the end of all lines (to support Windows line endings)
/// - Empty lines inside the sequence
///
/// Returns an error if there are:
/// - Errors while reading from the underlying reader
/// - Extra characters before the first record
/// - Non-alphabetic characters inside the sequence
/// - Empty ID or sequence fields in any record
#[derive(Debug, Clone, Eq, PartialEq, Dissolve)]
pub struct Reader<R> {
    reader: R,
}

impl Reader<()> {
    /// Open a plain or gzip-compressed FASTA file.
    pub fn from_path(
        path: impl AsRef<Path>,
    ) -> Result<Reader<Box<dyn BufRead + Send + Sync + 'static>>> {
        let path = path.as_ref();
        Reader::new(compression::read_file(path)?)
            .wrap_err_with(|| format!("Invalid FASTA file {}", path.display()))
    }

    /// Read every record of a plain or gzip-compressed FASTA file.
    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let mut records = Vec::new();
        Self::from_path(path)?
            .read_to_end(&mut records)
            .wrap_err_with(|| format!("Failed to parse FASTA file {}", path.display()))?;
        Ok(records)
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        // Check that there are no extra characters before the first record
        let buffer = reader.fill_buf()?;
        ensure!(
            buffer.first().map(|x| *x == b'>').unwrap_or(true),
            "Expected '>' at the start of the FASTA file"
        );
        Ok(Self { reader })
    }

    fn read_parts(&mut self, record: &mut Record) -> Result<bool> {
        // Ensure that the next symbol is '>' and consume it
        let buffer = self.reader.fill_buf()?;
        if buffer.is_empty() {
            return Ok(false);
        }
        ensure!(
            buffer[0] == b'>',
            "Expected '>' at the start of the FASTA record"
        );
        self.reader.consume(1);

        let (id, seq) = record.raw();

        id.clear();
        let read = self.reader.read_line(id)?;
        ensure!(read > 0, "Unexpected EOF after '>'");
        ensure!(
            id.ends_with('\n'),
            "FASTA ID line is not terminated with a newline : {id}"
        );
        id.pop();
        if id.ends_with('\r') {
            id.pop();
        }
        Record::validate_id(id)?;

        seq.clear();
        loop {
            let buffer = self.reader.fill_buf()?;
            // EOF or the start of the next record
            if buffer.is_empty() || buffer[0] == b'>' {
                break;
            }

            let (line, consume) = match memchr::memchr(b'\n', buffer) {
                Some(pos) => (&buffer[..pos], pos + 1),
                None => (buffer, buffer.len()),
            };
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            seq.extend_from_slice(line);
            self.reader.consume(consume);
        }
        Record::validate_seq(seq).wrap_err_with(|| format!("Invalid sequence for {id}"))?;

        Ok(true)
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    /// Parse the next FASTA record into the given [Record] buffer.
    ///
    /// On error the buffer is left in an unspecified state, but can be reused for the next read.
    fn read_record(&mut self, buf: &mut Self::Record) -> Result<bool> {
        self.read_parts(buf)
    }
}
