use std::fmt::Display;

/// Relation between a discovered protein and the closest annotated one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ErrorKind {
    Exact,
    /// Shorter at the N-terminus.
    TooShort,
    /// Longer at the N-terminus.
    TooLong,
    Changed,
    NotFound,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 5] = [
        ErrorKind::Exact,
        ErrorKind::TooShort,
        ErrorKind::TooLong,
        ErrorKind::Changed,
        ErrorKind::NotFound,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Exact => "EXACT",
            ErrorKind::TooShort => "TOO_SHORT",
            ErrorKind::TooLong => "TOO_LONG",
            ErrorKind::Changed => "CHANGED",
            ErrorKind::NotFound => "NOT_FOUND",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Number of proteins of every kind.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Tally {
    counts: [usize; 5],
}

impl Tally {
    pub fn add(&mut self, kind: ErrorKind) {
        self.counts[kind as usize] += 1;
    }

    pub fn get(&self, kind: ErrorKind) -> usize {
        self.counts[kind as usize]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl FromIterator<ErrorKind> for Tally {
    fn from_iter<T: IntoIterator<Item = ErrorKind>>(iter: T) -> Self {
        let mut tally = Self::default();
        iter.into_iter().for_each(|x| tally.add(x));
        tally
    }
}
