//! Headerless tab-separated files pairing relocalized genomic DNA with the proteins found in it.
//!
//! Each line has five columns: sample id, fragment id, genome location (`contig_begin{+|-}length`),
//! lowercase DNA and a comma-separated protein list.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{ensure, eyre, Result, WrapErr};
use itertools::Itertools;
use protmatch_core_rs::loc::{Location, Strand};

use crate::traits::{ReadRecord, WriteRecord};

const COLUMNS: usize = 5;

#[derive(Clone, PartialEq, Eq, Debug, Constructor, Dissolve, Getters)]
pub struct Record {
    sample_id: String,
    fragment_id: String,
    location: Location,
    dna: String,
    proteins: Vec<String>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            sample_id: String::new(),
            fragment_id: String::new(),
            location: Location::new("Default contig", 1, 1, Strand::Forward)
                .unwrap_or_else(|_| unreachable!()),
            dna: String::new(),
            proteins: Vec::new(),
        }
    }
}

impl Record {
    /// Parse a single line without its terminator.
    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        ensure!(
            fields.len() == COLUMNS,
            "Expected {COLUMNS} tab-separated columns, found {}: {line:?}",
            fields.len()
        );
        for (name, value) in [("sample", fields[0]), ("fragment", fields[1])] {
            ensure!(!value.is_empty(), "Empty {name} id in GTI line: {line:?}");
        }
        let location = fields[2]
            .parse()
            .wrap_err_with(|| format!("Invalid location in GTI line: {line:?}"))?;
        let proteins = fields[4]
            .split(',')
            .filter(|x| !x.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            sample_id: fields[0].to_string(),
            fragment_id: fields[1].to_string(),
            location,
            dna: fields[3].to_string(),
            proteins,
        })
    }
}

pub struct Reader<R> {
    reader: R,
    line: String,
    lineno: usize,
}

impl Reader<()> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Reader<BufReader<File>>> {
        let path = path.as_ref();
        let file = File::open(path)
            .wrap_err_with(|| format!("Failed to open GTI file {}", path.display()))?;
        Ok(Reader::new(BufReader::new(file)))
    }

    pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let mut records = Vec::new();
        Self::from_path(path)?
            .read_to_end(&mut records)
            .wrap_err_with(|| format!("Failed to parse GTI file {}", path.display()))?;
        Ok(records)
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            lineno: 0,
        }
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    /// Blank lines are skipped.
    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(false);
            }
            self.lineno += 1;

            let line = self.line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }
            *into = Record::parse(line).map_err(|e| eyre!("GTI line {}: {e}", self.lineno))?;
            return Ok(true);
        }
    }
}

pub struct Writer<W> {
    writer: W,
}

impl Writer<()> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Writer<BufWriter<File>>> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("Failed to create GTI file {}", path.display()))?;
        Ok(Writer::new(BufWriter::new(file)))
    }
}

impl<W: Write> Writer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{}\t{}",
            record.sample_id,
            record.fragment_id,
            record.location,
            record.dna,
            record.proteins.iter().join(",")
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
