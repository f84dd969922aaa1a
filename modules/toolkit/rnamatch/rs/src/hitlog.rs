//! Tab-separated log of the genome placements found for RNA fragments.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{Result, WrapErr};
use protmatch_core_rs::loc::Location;
use protmatch_io_rs::WriteRecord;

pub const HEADER: &str = "sample_id\trna_id\tgenome_loc\te_value\tp_ident\tq_ident";

/// Genome location chosen for a fragment and the quality of the alignment behind it.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct Placement {
    sample_id: String,
    fragment_id: String,
    location: Location,
    evalue: f64,
    pct_identity: f64,
    query_identity: f64,
}

pub struct Writer<W> {
    writer: W,
}

impl Writer<()> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Writer<BufWriter<File>>> {
        let path = path.as_ref();
        let file = File::create(path)
            .wrap_err_with(|| format!("Failed to create hit log {}", path.display()))?;
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
    type Record = Placement;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}\t{:>6}\t{:6.3}\t{:6.3}",
            record.sample_id,
            record.fragment_id,
            record.location,
            general(record.evalue, 4),
            record.pct_identity,
            record.query_identity
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Shortest of the fixed and scientific notations with `precision` significant digits, without
/// trailing zeros. Matches the `%g` conversion of printf.
pub fn general(value: f64, precision: usize) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_zeros(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_zeros(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
