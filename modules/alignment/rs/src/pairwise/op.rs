/// A single column of a global alignment between a reference (first) and a candidate (second) sequence.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Op {
    /// A residue present only in the candidate, i.e. a gap in the first sequence (v)
    GapFirst,
    /// A residue present only in the reference, i.e. a gap in the second sequence (^)
    GapSecond,
    /// Identical residues (=)
    Match,
    /// Different residues at the same column (X)
    Mismatch,
}

impl Op {
    /// Returns `true` if the operation consumes a residue from both sequences.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Op::Match | Op::Mismatch)
    }

    pub fn symbol(&self) -> char {
        match self {
            Op::GapFirst => 'v',
            Op::GapSecond => '^',
            Op::Match => '=',
            Op::Mismatch => 'X',
        }
    }
}

impl TryFrom<char> for Op {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'v' => Ok(Op::GapFirst),
            '^' => Ok(Op::GapSecond),
            '=' => Ok(Op::Match),
            'X' => Ok(Op::Mismatch),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        for op in [Op::GapFirst, Op::GapSecond, Op::Match, Op::Mismatch] {
            assert_eq!(Op::try_from(op.symbol()), Ok(op));
        }
        assert_eq!(Op::try_from('~'), Err(()));
    }

    #[test]
    fn test_is_diagonal() {
        assert!(Op::Match.is_diagonal());
        assert!(Op::Mismatch.is_diagonal());
        assert!(!Op::GapFirst.is_diagonal());
        assert!(!Op::GapSecond.is_diagonal());
    }
}
