/// Complement of a single IUPAC nucleotide code, preserving its case. Unknown symbols are kept as is.
pub fn complement(base: u8) -> u8 {
    let comp = match base.to_ascii_lowercase() {
        b'a' => b't',
        b't' | b'u' => b'a',
        b'c' => b'g',
        b'g' => b'c',
        b'r' => b'y',
        b'y' => b'r',
        b'k' => b'm',
        b'm' => b'k',
        b'b' => b'v',
        b'v' => b'b',
        b'd' => b'h',
        b'h' => b'd',
        // s, w, n and gaps are their own complements
        other => other,
    };
    if base.is_ascii_uppercase() {
        comp.to_ascii_uppercase()
    } else {
        comp
    }
}

pub fn reverse_complement(seq: &[u8]) -> Vec<u8> {
    seq.iter().rev().map(|&b| complement(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complement() {
        assert_eq!(complement(b'a'), b't');
        assert_eq!(complement(b'G'), b'C');
        assert_eq!(complement(b'u'), b'a');
        assert_eq!(complement(b'R'), b'Y');
        assert_eq!(complement(b'n'), b'n');
        assert_eq!(complement(b'-'), b'-');
    }

    #[test]
    fn test_reverse_complement() {
        assert_eq!(reverse_complement(b"atgAAAcgt"), b"acgTTTcat");
        assert_eq!(reverse_complement(b""), b"");
        let seq = b"acgtnrykmACGT";
        assert_eq!(reverse_complement(&reverse_complement(seq)), seq);
    }
}
