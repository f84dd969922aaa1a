use std::cmp::Ordering;
use std::thread::available_parallelism;

use eyre::Result;

/// Resolve the requested number of worker threads against the machine limits.
///
/// Positive values are capped by the number of available cores, zero means a single thread,
/// and negative values count back from the maximum (-1 = all cores, -2 = all but one, ...).
pub fn available(requested: isize) -> Result<usize> {
    let max = available_parallelism()?.get() as isize;
    Ok(normalize(requested, max))
}

fn normalize(requested: isize, max: isize) -> usize {
    match requested.cmp(&0) {
        Ordering::Less => (max + requested + 1).max(1) as usize,
        Ordering::Equal => 1,
        Ordering::Greater => requested.min(max) as usize,
    }
}
