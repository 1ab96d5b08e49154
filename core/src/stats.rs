//! Per-group Counters and Probability Estimation
//!
//! [`GroupStatistics`] is a fixed-length counter indexed by group. The same
//! type serves as a source's ground truth, as a running sample tracker, as
//! the engine's collected counts and as the target query itself.
//!
//! [`ProbabilityMethod`] selects how a source turns its counters into an
//! estimate of P(group | source).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// Fixed-length per-group counter with a running total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u64>", into = "Vec<u64>")]
pub struct GroupStatistics {
    counts: Vec<u64>,
    total: u64,
}

impl GroupStatistics {
    /// Create an all-zero counter for `num_groups` groups
    pub fn new(num_groups: usize) -> Self {
        Self::uniform(num_groups, 0)
    }

    /// Create a counter with every group starting at `initial`
    pub fn uniform(num_groups: usize, initial: u64) -> Self {
        Self {
            counts: vec![initial; num_groups],
            total: initial * num_groups as u64,
        }
    }

    /// Create a counter from explicit per-group counts
    pub fn from_counts(counts: Vec<u64>) -> Self {
        let total = counts.iter().sum();
        Self { counts, total }
    }

    /// Number of groups tracked
    pub fn num_groups(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Current counter for `group`
    pub fn count(&self, group: usize) -> u64 {
        self.counts[group]
    }

    /// All counters in group order
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Increment the counter for `group`
    pub fn add(&mut self, group: usize) {
        self.counts[group] += 1;
        self.total += 1;
    }

    /// Inverse of [`add`](Self::add)
    pub fn decrement(&mut self, group: usize) {
        debug_assert!(self.counts[group] > 0, "decrement below zero for group {}", group);
        self.counts[group] = self.counts[group].saturating_sub(1);
        self.total = self.total.saturating_sub(1);
    }

    /// Point estimate `(count(g) - excluded) / total`
    ///
    /// Returns `None` while the total is zero.
    pub fn point_probability(&self, group: usize, excluded: u64) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let net = self.counts[group] as f64 - excluded as f64;
        Some(net / self.total as f64)
    }

    /// Estimate smoothed with a uniform Dirichlet prior of total weight `prior_weight`
    ///
    /// With `a = w/(m+1)` and `b = m·w/(m+1)` this is
    /// `(count(g) - excluded + a) / (total + b)`. Returns `None` while the
    /// total is zero.
    pub fn bayes_probability(&self, group: usize, prior_weight: f64, excluded: u64) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        let m = self.num_groups() as f64;
        let a = prior_weight / (m + 1.0);
        let b = m * prior_weight / (m + 1.0);
        let net = self.counts[group] as f64 - excluded as f64;
        Some((net + a) / (self.total as f64 + b))
    }

    /// Whether `self`, read as a query, is met by `other`, read as collected counts
    pub fn is_satisfied_by(&self, other: &GroupStatistics) -> bool {
        self.counts
            .iter()
            .enumerate()
            .all(|(g, &wanted)| wanted <= other.count(g))
    }

    /// `max(0, self[g] - other[g])` for a query `self` and collected counts `other`
    pub fn remaining(&self, other: &GroupStatistics, group: usize) -> u64 {
        self.counts[group].saturating_sub(other.count(group))
    }
}

impl Index<usize> for GroupStatistics {
    type Output = u64;

    fn index(&self, group: usize) -> &u64 {
        &self.counts[group]
    }
}

impl From<Vec<u64>> for GroupStatistics {
    fn from(counts: Vec<u64>) -> Self {
        Self::from_counts(counts)
    }
}

impl From<GroupStatistics> for Vec<u64> {
    fn from(stats: GroupStatistics) -> Self {
        stats.counts
    }
}

impl fmt::Display for GroupStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.counts)
    }
}

/// Which counters an estimate is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimate {
    /// Exact distribution of the source
    GroundTruth,
    /// Empirical frequency over the draws made so far in this run
    Sample,
    /// Dirichlet-smoothed empirical frequency
    Bayes,
}

/// An [`Estimate`] combined with the duplicate correction flag
///
/// With `exclude_claimed` set, draws that this source already contributed
/// as new samples are subtracted from the numerator, which approximates
/// sampling without replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbabilityMethod {
    pub estimate: Estimate,
    pub exclude_claimed: bool,
}

impl ProbabilityMethod {
    pub const fn ground_truth() -> Self {
        Self { estimate: Estimate::GroundTruth, exclude_claimed: false }
    }

    pub const fn sample() -> Self {
        Self { estimate: Estimate::Sample, exclude_claimed: false }
    }

    pub const fn bayes() -> Self {
        Self { estimate: Estimate::Bayes, exclude_claimed: false }
    }

    /// Set the duplicate correction flag
    pub const fn dedup(mut self, exclude_claimed: bool) -> Self {
        self.exclude_claimed = exclude_claimed;
        self
    }
}

impl Default for ProbabilityMethod {
    fn default() -> Self {
        Self::ground_truth()
    }
}

impl fmt::Display for ProbabilityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let estimate = match self.estimate {
            Estimate::GroundTruth => "gt",
            Estimate::Sample => "sample",
            Estimate::Bayes => "bayes",
        };
        let dupe = if self.exclude_claimed { "dupe" } else { "nodupe" };
        write!(f, "{}-{}", estimate, dupe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_uniform_and_explicit_construction() {
        let stats = GroupStatistics::uniform(3, 4);
        assert_eq!(stats.counts(), &[4, 4, 4]);
        assert_eq!(stats.total(), 12);

        let stats = GroupStatistics::from_counts(vec![5, 0, 2]);
        assert_eq!(stats.total(), 7);
        assert_eq!(stats[0], 5);
        assert_eq!(stats.count(2), 2);
    }

    #[test]
    fn test_point_probability() {
        let mut stats = GroupStatistics::new(2);
        assert_eq!(stats.point_probability(0, 0), None);

        stats.add(0);
        stats.add(0);
        stats.add(0);
        stats.add(1);
        assert_eq!(stats.point_probability(0, 0), Some(0.75));
        assert_eq!(stats.point_probability(1, 0), Some(0.25));
        // Excluded draws leave the denominator alone
        assert_eq!(stats.point_probability(0, 2), Some(0.25));
    }

    #[test]
    fn test_bayes_probability() {
        let mut stats = GroupStatistics::new(4);
        assert_eq!(stats.bayes_probability(0, 10.0, 0), None);

        stats.add(0);
        stats.add(1);
        stats.add(1);
        // a = 10/5 = 2, b = 4*10/5 = 8
        let p = stats.bayes_probability(0, 10.0, 0).unwrap();
        assert!((p - (1.0 + 2.0) / (3.0 + 8.0)).abs() < 1e-12);
        let p = stats.bayes_probability(1, 10.0, 1).unwrap();
        assert!((p - (1.0 + 2.0) / (3.0 + 8.0)).abs() < 1e-12);
        // Unseen groups still get a positive estimate
        assert!(stats.bayes_probability(3, 10.0, 0).unwrap() > 0.0);
    }

    #[test]
    fn test_is_satisfied_by() {
        let query = GroupStatistics::from_counts(vec![2, 1]);
        let mut collected = GroupStatistics::new(2);
        assert!(!query.is_satisfied_by(&collected));

        collected.add(0);
        collected.add(0);
        assert!(!query.is_satisfied_by(&collected));

        collected.add(1);
        assert!(query.is_satisfied_by(&collected));

        collected.add(1);
        assert!(query.is_satisfied_by(&collected));
        assert_eq!(query.remaining(&collected, 1), 0);
    }

    #[test]
    fn test_empty_query_is_satisfied() {
        let query = GroupStatistics::new(3);
        assert!(query.is_satisfied_by(&GroupStatistics::new(3)));
    }

    #[test]
    fn test_serde_as_plain_list() {
        let stats = GroupStatistics::from_counts(vec![3, 1]);
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, "[3,1]");
        let back: GroupStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
        assert_eq!(back.total(), 4);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(ProbabilityMethod::ground_truth().to_string(), "gt-nodupe");
        assert_eq!(ProbabilityMethod::bayes().dedup(true).to_string(), "bayes-dupe");
        assert_eq!(ProbabilityMethod::default(), ProbabilityMethod::ground_truth());
    }

    proptest! {
        #[test]
        fn add_then_decrement_restores(
            counts in proptest::collection::vec(0u64..50, 1..8),
            pick in any::<prop::sample::Index>(),
        ) {
            let before = GroupStatistics::from_counts(counts);
            let group = pick.index(before.num_groups());
            let mut stats = before.clone();
            stats.add(group);
            stats.decrement(group);
            prop_assert_eq!(stats, before);
        }

        #[test]
        fn satisfied_by_is_reflexive(counts in proptest::collection::vec(0u64..50, 0..8)) {
            let stats = GroupStatistics::from_counts(counts);
            prop_assert!(stats.is_satisfied_by(&stats));
        }

        #[test]
        fn point_probabilities_sum_to_one(counts in proptest::collection::vec(0u64..50, 1..8)) {
            let stats = GroupStatistics::from_counts(counts);
            let probs: Vec<Option<f64>> = (0..stats.num_groups())
                .map(|g| stats.point_probability(g, 0))
                .collect();
            if stats.total() == 0 {
                prop_assert!(probs.iter().all(Option::is_none));
            } else {
                let sum: f64 = probs.iter().map(|p| p.unwrap()).sum();
                prop_assert!((sum - 1.0).abs() < 1e-9, "sum={}", sum);
            }
        }
    }
}
