use derive_getters::Getters;
use eyre::{eyre, Result};
use itertools::Itertools;

use super::Hit;

/// Filtering parameters shared by every aligner.
///
/// Percentages are in [0, 100], fractions are in [0, 1]. Hits violating any threshold are discarded.
#[derive(Clone, PartialEq, Debug, Getters)]
pub struct Parms {
    max_evalue: f64,
    min_pct_identity: f64,
    min_query_coverage: f64,
    min_subject_coverage: f64,
    min_query_bit_score: f64,
    min_query_identity: f64,
    max_per_query: Option<usize>,
}

impl Default for Parms {
    fn default() -> Self {
        Self {
            max_evalue: 1e-10,
            min_pct_identity: 0.0,
            min_query_coverage: 0.0,
            min_subject_coverage: 0.0,
            min_query_bit_score: 0.0,
            min_query_identity: 0.0,
            max_per_query: None,
        }
    }
}

fn percent(name: &str, value: f64) -> Result<f64> {
    if !(0.0..=100.0).contains(&value) {
        return Err(eyre!("{name} must be between 0 and 100, got {value}"));
    }
    Ok(value)
}

impl Parms {
    pub fn set_max_evalue(&mut self, max_evalue: f64) -> Result<&mut Self> {
        if !(0.0..1.0).contains(&max_evalue) {
            return Err(eyre!("Maximum e-value must be in [0, 1), got {max_evalue}"));
        }
        self.max_evalue = max_evalue;
        Ok(self)
    }

    pub fn set_min_pct_identity(&mut self, min_pct_identity: f64) -> Result<&mut Self> {
        self.min_pct_identity = percent("Minimum percent identity", min_pct_identity)?;
        Ok(self)
    }

    pub fn set_min_query_coverage(&mut self, min_query_coverage: f64) -> Result<&mut Self> {
        self.min_query_coverage = percent("Minimum query coverage", min_query_coverage)?;
        Ok(self)
    }

    pub fn set_min_subject_coverage(&mut self, min_subject_coverage: f64) -> Result<&mut Self> {
        self.min_subject_coverage = percent("Minimum subject coverage", min_subject_coverage)?;
        Ok(self)
    }

    pub fn set_min_query_bit_score(&mut self, min_query_bit_score: f64) -> Result<&mut Self> {
        if !(0.0..=10.0).contains(&min_query_bit_score) {
            return Err(eyre!(
                "Minimum query-scaled bit score must be between 0 and 10, got {min_query_bit_score}"
            ));
        }
        self.min_query_bit_score = min_query_bit_score;
        Ok(self)
    }

    pub fn set_min_query_identity(&mut self, min_query_identity: f64) -> Result<&mut Self> {
        if !(0.0..=1.0).contains(&min_query_identity) {
            return Err(eyre!(
                "Minimum query identity fraction must be between 0 and 1, got {min_query_identity}"
            ));
        }
        self.min_query_identity = min_query_identity;
        Ok(self)
    }

    pub fn set_max_per_query(&mut self, max_per_query: Option<usize>) -> Result<&mut Self> {
        if max_per_query == Some(0) {
            return Err(eyre!("Maximum hits per query must be at least 1"));
        }
        self.max_per_query = max_per_query;
        Ok(self)
    }

    pub fn accepts(&self, hit: &Hit) -> bool {
        *hit.evalue() <= self.max_evalue
            && *hit.pct_identity() >= self.min_pct_identity
            && hit.query_coverage() >= self.min_query_coverage
            && hit.subject_coverage() >= self.min_subject_coverage
            && hit.query_bit_score() >= self.min_query_bit_score
            && hit.query_identity() >= self.min_query_identity
    }

    /// Drop rejected hits and keep at most `max_per_query` best-scoring hits for every query.
    /// The relative order of the surviving hits is preserved.
    pub fn filter(&self, hits: Vec<Hit>) -> Vec<Hit> {
        let hits: Vec<Hit> = hits.into_iter().filter(|x| self.accepts(x)).collect();
        let Some(limit) = self.max_per_query else {
            return hits;
        };

        let mut keep = vec![false; hits.len()];
        let groups = (0..hits.len()).into_group_map_by(|ind| hits[*ind].query_id());
        for (_, group) in groups {
            group
                .into_iter()
                .sorted_by(|a, b| hits[*b].bit_score().total_cmp(hits[*a].bit_score()))
                .take(limit)
                .for_each(|ind| keep[ind] = true);
        }
        hits.into_iter()
            .zip(keep)
            .filter_map(|(hit, keep)| keep.then_some(hit))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protmatch_core_rs::loc::{Location, Strand};

    fn hit(query: &str, evalue: f64, pident: f64, bit_score: f64) -> Hit {
        Hit::new(
            100,
            Location::new(query, 1, 90, Strand::Forward).unwrap(),
            1000,
            Location::new("subject", 1, 270, Strand::Forward).unwrap(),
            String::new(),
            evalue,
            pident,
            bit_score,
            60,
            90,
        )
    }

    #[test]
    fn test_setters_validate() {
        let mut parms = Parms::default();
        assert!(parms.set_max_evalue(1.0).is_err());
        assert!(parms.set_max_evalue(-1e-5).is_err());
        assert!(parms.set_min_pct_identity(100.5).is_err());
        assert!(parms.set_min_query_coverage(-1.0).is_err());
        assert!(parms.set_min_subject_coverage(101.0).is_err());
        assert!(parms.set_min_query_bit_score(10.5).is_err());
        assert!(parms.set_min_query_identity(1.1).is_err());
        assert!(parms.set_max_per_query(Some(0)).is_err());
        assert_eq!(parms, Parms::default());

        parms
            .set_max_evalue(1e-20)
            .unwrap()
            .set_min_query_coverage(95.0)
            .unwrap();
        assert_eq!(*parms.max_evalue(), 1e-20);
        assert_eq!(*parms.min_query_coverage(), 95.0);
    }

    #[test]
    fn test_accepts() {
        let mut parms = Parms::default();
        assert!(parms.accepts(&hit("q", 1e-30, 50.0, 200.0)));
        assert!(!parms.accepts(&hit("q", 1e-5, 50.0, 200.0)));

        parms.set_min_query_coverage(90.0).unwrap();
        assert!(parms.accepts(&hit("q", 1e-30, 50.0, 200.0)));
        parms.set_min_query_coverage(91.0).unwrap();
        assert!(!parms.accepts(&hit("q", 1e-30, 50.0, 200.0)));

        let mut parms = Parms::default();
        parms.set_min_query_bit_score(1.1).unwrap();
        assert!(!parms.accepts(&hit("q", 1e-30, 50.0, 100.0)));
        parms.set_min_query_identity(0.6).unwrap();
        assert!(parms.accepts(&hit("q", 1e-30, 50.0, 110.0)));
        parms.set_min_pct_identity(60.0).unwrap();
        assert!(!parms.accepts(&hit("q", 1e-30, 50.0, 110.0)));
    }

    #[test]
    fn test_filter_per_query() {
        let hits = vec![
            hit("a", 1e-30, 90.0, 100.0),
            hit("b", 1e-30, 90.0, 100.0),
            hit("a", 1e-30, 90.0, 300.0),
            hit("a", 1e-3, 90.0, 900.0),
            hit("a", 1e-30, 90.0, 200.0),
        ];
        let mut parms = Parms::default();
        assert_eq!(parms.filter(hits.clone()).len(), 4);

        parms.set_max_per_query(Some(2)).unwrap();
        let kept: Vec<_> = parms
            .filter(hits)
            .iter()
            .map(|x| (x.query_id().to_string(), *x.bit_score()))
            .collect();
        assert_eq!(
            kept,
            [("b".to_string(), 100.0), ("a".to_string(), 300.0), ("a".to_string(), 200.0)]
        );
    }
}
