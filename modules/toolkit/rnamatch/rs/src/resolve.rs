use protmatch_core_rs::loc::Location;

/// Keep a single reading frame for every stop codon.
///
/// A frame replaces an already kept frame with the same stop only when it is strictly longer; the
/// replacement moves to the end of the list. Returns the kept frames and the number of discarded ones.
pub fn resolve(orfs: impl IntoIterator<Item = Location>) -> (Vec<Location>, usize) {
    let mut kept: Vec<Location> = Vec::new();
    let mut redundant = 0;
    for orf in orfs {
        match kept.iter().position(|x| x.right() == orf.right()) {
            Some(ind) => {
                redundant += 1;
                if kept[ind].len() < orf.len() {
                    kept.remove(ind);
                    kept.push(orf);
                }
            }
            None => kept.push(orf),
        }
    }
    (kept, redundant)
}
