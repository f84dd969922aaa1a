use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use super::Op;

/// Decomposition of the Levenshtein distance between a reference and a candidate sequence.
///
/// Insertions are residues present only in the candidate, deletions are residues missing from it.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Edits {
    insertions: usize,
    deletions: usize,
    substitutions: usize,
}

impl Edits {
    /// Compute the edit decomposition of an optimal global alignment.
    pub fn between(reference: &[u8], candidate: &[u8]) -> Self {
        let mut edits = Self::default();
        for op in edit_script(reference, candidate) {
            match op {
                Op::GapFirst => edits.insertions += 1,
                Op::GapSecond => edits.deletions += 1,
                Op::Mismatch => edits.substitutions += 1,
                Op::Match => {}
            }
        }
        edits
    }

    /// Total number of edits, i.e. the Levenshtein distance.
    pub fn distance(&self) -> usize {
        self.insertions + self.deletions + self.substitutions
    }
}

/// Optimal global alignment with unit costs, as a column-by-column script.
///
/// Among equally good alignments the traceback prefers diagonal steps, then deletions.
pub fn edit_script(reference: &[u8], candidate: &[u8]) -> Vec<Op> {
    let (n, m) = (reference.len(), candidate.len());
    let width = m + 1;
    let mut dist = vec![0usize; (n + 1) * width];
    for j in 0..=m {
        dist[j] = j;
    }
    for i in 1..=n {
        dist[i * width] = i;
        for j in 1..=m {
            let cost = usize::from(reference[i - 1] != candidate[j - 1]);
            dist[i * width + j] = (dist[(i - 1) * width + j - 1] + cost)
                .min(dist[(i - 1) * width + j] + 1)
                .min(dist[i * width + j - 1] + 1);
        }
    }

    let mut script = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        let current = dist[i * width + j];
        if i > 0 && j > 0 {
            let same = reference[i - 1] == candidate[j - 1];
            if current == dist[(i - 1) * width + j - 1] + usize::from(!same) {
                script.push(if same { Op::Match } else { Op::Mismatch });
                i -= 1;
                j -= 1;
                continue;
            }
        }
        if i > 0 && current == dist[(i - 1) * width + j] + 1 {
            script.push(Op::GapSecond);
            i -= 1;
        } else {
            script.push(Op::GapFirst);
            j -= 1;
        }
    }
    script.reverse();
    script
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(script: &[Op]) -> String {
        script.iter().map(|x| x.symbol()).collect()
    }

    #[test]
    fn test_identical() {
        assert_eq!(Edits::between(b"MKVL", b"MKVL"), Edits::default());
        assert_eq!(symbols(&edit_script(b"MKVL", b"MKVL")), "====");
        assert!(edit_script(b"", b"").is_empty());
    }

    #[test]
    fn test_edits() {
        // One substitution
        assert_eq!(Edits::between(b"MKVLA", b"MKWLA"), Edits::new(0, 0, 1));
        // Candidate carries an extra residue
        assert_eq!(Edits::between(b"MKVLA", b"MKVQLA"), Edits::new(1, 0, 0));
        // Candidate misses two residues
        assert_eq!(Edits::between(b"MKVLAGG", b"MKVLA"), Edits::new(0, 2, 0));
        assert_eq!(Edits::between(b"", b"MKV"), Edits::new(3, 0, 0));
        assert_eq!(Edits::between(b"MKV", b""), Edits::new(0, 3, 0));
    }

    #[test]
    fn test_distance_is_levenshtein() {
        for (a, b, expected) in [
            (&b"kitten"[..], &b"sitting"[..], 3),
            (b"flaw", b"lawn", 2),
            (b"intention", b"execution", 5),
        ] {
            let edits = Edits::between(a, b);
            assert_eq!(edits.distance(), expected, "{edits:?}");

            let script = edit_script(a, b);
            let consumed_a = script.iter().filter(|x| **x != Op::GapFirst).count();
            let consumed_b = script.iter().filter(|x| **x != Op::GapSecond).count();
            assert_eq!((consumed_a, consumed_b), (a.len(), b.len()));
        }
    }
}
