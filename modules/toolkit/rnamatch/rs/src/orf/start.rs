use std::fmt::Display;
use std::str::FromStr;

use derive_getters::Getters;
use derive_more::Constructor;
use eyre::{eyre, Report};

/// In-frame start codon found upstream of a hit.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Constructor, Getters)]
pub struct Candidate {
    /// 1-based position of the first base.
    pos: u64,
    /// First base of the codon, lowercase (`a`, `g` or `t`).
    first: u8,
}

/// Chooses the start codon of a reading frame among its candidates.
///
/// Candidates are ordered from the nearest to the hit to the furthest upstream.
pub trait StartPicker {
    fn pick(&self, candidates: &[Candidate]) -> Option<u64>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Nearest;

impl StartPicker for Nearest {
    fn pick(&self, candidates: &[Candidate]) -> Option<u64> {
        candidates.first().map(|x| x.pos)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Longest;

impl StartPicker for Longest {
    fn pick(&self, candidates: &[Candidate]) -> Option<u64> {
        candidates.last().map(|x| x.pos)
    }
}

/// Prefers ATG over GTG over TTG, the nearest one within each class.
#[derive(Clone, Copy, Debug, Default)]
pub struct Biased;

impl StartPicker for Biased {
    fn pick(&self, candidates: &[Candidate]) -> Option<u64> {
        [b'a', b'g', b't'].iter().find_map(|first| {
            candidates
                .iter()
                .find(|x| x.first == *first)
                .map(|x| x.pos)
        })
    }
}

/// Configurable choice of the start picker.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum StartStrategy {
    #[default]
    Nearest,
    Longest,
    Biased,
}

impl StartStrategy {
    pub fn picker(&self) -> &'static (dyn StartPicker + Send + Sync) {
        match self {
            StartStrategy::Nearest => &Nearest,
            StartStrategy::Longest => &Longest,
            StartStrategy::Biased => &Biased,
        }
    }
}

impl Display for StartStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StartStrategy::Nearest => "nearest",
            StartStrategy::Longest => "longest",
            StartStrategy::Biased => "biased",
        };
        write!(f, "{name}")
    }
}

impl FromStr for StartStrategy {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nearest" => Ok(StartStrategy::Nearest),
            "longest" => Ok(StartStrategy::Longest),
            "biased" => Ok(StartStrategy::Biased),
            _ => Err(eyre!("Unknown start strategy: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new(100, b't'),
            Candidate::new(64, b'g'),
            Candidate::new(31, b'a'),
            Candidate::new(10, b'g'),
        ]
    }

    #[test]
    fn test_pickers() {
        let candidates = candidates();
        assert_eq!(Nearest.pick(&candidates), Some(100));
        assert_eq!(Longest.pick(&candidates), Some(10));
        assert_eq!(Biased.pick(&candidates), Some(31));
        assert_eq!(Biased.pick(&candidates[..2]), Some(64));

        for strategy in [
            StartStrategy::Nearest,
            StartStrategy::Longest,
            StartStrategy::Biased,
        ] {
            assert_eq!(strategy.picker().pick(&[]), None);
        }
    }

    #[test]
    fn test_strategy_names() {
        for strategy in [
            StartStrategy::Nearest,
            StartStrategy::Longest,
            StartStrategy::Biased,
        ] {
            assert_eq!(strategy.to_string().parse::<StartStrategy>().unwrap(), strategy);
        }
        assert_eq!("LONGEST".parse::<StartStrategy>().unwrap(), StartStrategy::Longest);
        assert!("first".parse::<StartStrategy>().is_err());
    }
}
