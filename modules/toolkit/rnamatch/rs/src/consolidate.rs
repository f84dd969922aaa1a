use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::Result;
use protmatch_alignment_rs::Hit;
use protmatch_core_rs::loc::{Location, Strand};
use protmatch_core_rs::seq;

/// Profile hit expressed on the forward strand of the working sequence.
#[derive(Clone, PartialEq, Debug, Constructor, Dissolve, Getters)]
pub struct ProfileHit {
    profile_id: String,
    loc: Location,
    origin_len: u64,
}

/// RNA sequence in its working orientation together with the profile hits kept by the strand vote.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct Consolidated {
    /// Lowercase sequence, reverse complemented when `reversed` is set.
    seq: Vec<u8>,
    reversed: bool,
    hits: Vec<ProfileHit>,
    /// Hits on the losing strand.
    dropped: usize,
}

impl Consolidated {
    /// Location in the working orientation mapped back onto the RNA sequence as it was read.
    pub fn original(&self, loc: &Location) -> Result<Location> {
        if self.reversed {
            loc.converse(self.seq.len() as u64)
        } else {
            Ok(loc.clone())
        }
    }
}

/// Pick the dominant strand of the hits of a single sequence by majority vote.
///
/// Forward wins ties. When the reverse strand wins, the sequence is reverse complemented and the
/// surviving hits are moved to its forward strand.
pub fn consolidate<'a>(
    seq: &[u8],
    hits: impl IntoIterator<Item = &'a Hit>,
) -> Result<Consolidated> {
    let hits: Vec<&Hit> = hits.into_iter().collect();
    let vote: i64 = hits.iter().map(|x| x.subject_loc().strand().vote()).sum();
    let (strand, reversed) = if vote >= 0 {
        (Strand::Forward, false)
    } else {
        (Strand::Reverse, true)
    };

    let seq = seq.to_ascii_lowercase();
    let seq_len = seq.len() as u64;
    let seq = if reversed {
        seq::reverse_complement(&seq)
    } else {
        seq
    };

    let mut kept = Vec::with_capacity(hits.len());
    for hit in &hits {
        let loc = hit.subject_loc();
        if *loc.strand() != strand {
            continue;
        }
        let loc = if reversed {
            loc.converse(seq_len)?
        } else {
            loc.clone()
        };
        kept.push(ProfileHit::new(hit.query_id().to_string(), loc, seq_len));
    }

    Ok(Consolidated {
        seq,
        reversed,
        dropped: hits.len() - kept.len(),
        hits: kept,
    })
}
