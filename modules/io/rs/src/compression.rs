use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use eyre::{ensure, Result, WrapErr};
use flate2::read::MultiGzDecoder;

/// Open a file for buffered reading, transparently decompressing gzip content.
///
/// The compression is inferred from the file signature, everything else is read as plain text.
pub fn read_file(path: impl AsRef<Path>) -> Result<Box<dyn BufRead + Send + Sync + 'static>> {
    let path = path.as_ref();
    ensure!(path.exists(), "File {} does not exist", path.display());

    let kind = infer::get_from_path(path)
        .wrap_err_with(|| format!("Failed to inspect {}", path.display()))?;
    let file = File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;

    let stream: Box<dyn BufRead + Send + Sync + 'static> =
        match kind.map(|x| (x.extension(), x.mime_type())) {
            Some(("gz", "application/gzip")) => Box::new(BufReader::new(MultiGzDecoder::new(file))),
            // Always assume plain text if there is no clear match
            _ => Box::new(BufReader::new(file)),
        };
    Ok(stream)
}
