use derive_getters::{Dissolve, Getters};
use derive_more::Into;
use eyre::{ensure, Result};
use std::error::Error;

/// A single FASTA record with the following guarantees:
/// - The ID is a non-empty UTF-8 string without newline characters (CR or LF).
/// - The sequence is non-empty and contains only ASCII alphabetic characters.
///
/// The first whitespace-delimited word of the ID is the record label, the rest is a free-form comment.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Dissolve, Getters, Into)]
pub struct Record {
    id: String,
    seq: Vec<u8>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: "Default ID".to_string(),
            seq: b"ACGT".to_vec(),
        }
    }
}

impl<ID, SEQ> TryFrom<(ID, SEQ)> for Record
where
    ID: TryInto<String, Error: Error + Send + Sync + 'static>,
    SEQ: TryInto<Vec<u8>, Error: Error + Send + Sync + 'static>,
{
    type Error = eyre::Report;

    fn try_from(value: (ID, SEQ)) -> Result<Self> {
        Self::new(value.0.try_into()?, value.1.try_into()?)
    }
}

impl Record {
    pub fn new(id: String, seq: Vec<u8>) -> Result<Self> {
        Self::validate_id(&id)?;
        Self::validate_seq(&seq)?;
        Ok(Self { id, seq })
    }

    pub fn validate_id(id: &str) -> Result<()> {
        ensure!(!id.trim().is_empty(), "FASTA ID cannot be empty");
        ensure!(
            !id.contains(['\n', '\r']),
            "Newline characters are not allowed in the FASTA ID: {id}"
        );
        Ok(())
    }

    pub fn validate_seq(seq: &[u8]) -> Result<()> {
        ensure!(!seq.is_empty(), "FASTA sequence cannot be empty");
        for (i, &x) in seq.iter().enumerate() {
            ensure!(
                x.is_ascii_alphabetic(),
                "Non-alphabetic character at index {i} = {x:?}"
            );
        }
        Ok(())
    }

    /// First word of the ID line.
    pub fn label(&self) -> &str {
        self.id.split_whitespace().next().unwrap_or_default()
    }

    /// Everything after the label, trimmed.
    pub fn comment(&self) -> &str {
        let id = self.id.trim_start();
        id.split_once(char::is_whitespace)
            .map(|(_, comment)| comment.trim())
            .unwrap_or_default()
    }

    /// Reuse the buffers of an existing record. Contents are validated by the caller.
    pub(crate) fn raw(&mut self) -> (&mut String, &mut Vec<u8>) {
        (&mut self.id, &mut self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() -> Result<()> {
        for (id, seq) in [
            ("TRINITY_GG_131_c0_g1_i1 len=1200", "acgtACGT"),
            (" id ", "a"),
            ("internal 💉 spaces and emoji here", "MKV"),
        ] {
            let record: Record = (id, seq).try_into()?;
            assert_eq!(record.id(), id);
            assert_eq!(record.seq(), seq.as_bytes());
        }
        Ok(())
    }

    #[test]
    fn test_label_and_comment() -> Result<()> {
        let record: Record = ("TRINITY_GG_131_c0_g1_i1 len=1200  path=[0]", "ACGT").try_into()?;
        assert_eq!(record.label(), "TRINITY_GG_131_c0_g1_i1");
        assert_eq!(record.comment(), "len=1200  path=[0]");

        let record: Record = ("single", "ACGT").try_into()?;
        assert_eq!(record.label(), "single");
        assert_eq!(record.comment(), "");
        Ok(())
    }

    #[test]
    fn test_invalid_records() {
        for (id, seq) in [
            ("", "ACGT"),
            ("   ", "ACGT"),
            ("id\n", "ACGT"),
            ("id\r\n", "ACGT"),
            ("id", ""),
            ("id", "ACGT1"),
            ("id", "ACG T"),
        ] {
            let record: Result<Record> = (id, seq).try_into();
            assert!(record.is_err(), "Record: {:?}", record);
        }
    }
}
