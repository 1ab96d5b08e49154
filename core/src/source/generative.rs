//! Generative source - synthetic samples from a fixed group distribution

use super::{DataSource, SourceKind};
use crate::error::{Error, Result};
use crate::sample::Sample;
use crate::stats::{Estimate, GroupStatistics, ProbabilityMethod};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};
use std::fmt;

/// Upper bound (exclusive) of synthesized payloads
const PAYLOAD_SPACE: u64 = i64::MAX as u64;

/// Data source with a known distribution over groups and no finite universe
///
/// Every draw synthesizes a fresh random payload, so duplicates only occur
/// by payload collision, which is negligible.
#[derive(Debug, Clone)]
pub struct GenerativeSource {
    num_groups: usize,
    cost: f64,
    probs: Vec<f64>,
    distribution: WeightedIndex<f64>,
    sample_stats: GroupStatistics,
    unique_sample_stats: GroupStatistics,
}

impl GenerativeSource {
    /// Create a source from per-group weights, normalized to sum to one
    pub fn new(num_groups: usize, cost: f64, weights: &[f64]) -> Result<Self> {
        Error::check_cost(cost)?;
        if weights.len() != num_groups {
            return Err(Error::GroupCountMismatch {
                expected: num_groups,
                got: weights.len(),
            });
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidWeights(format!(
                "weights must be finite and non-negative: {:?}",
                weights
            )));
        }
        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(Error::InvalidWeights("weights sum to zero".to_string()));
        }

        let probs: Vec<f64> = weights.iter().map(|w| w / sum).collect();
        let distribution =
            WeightedIndex::new(&probs).map_err(|e| Error::InvalidWeights(e.to_string()))?;

        Ok(Self {
            num_groups,
            cost,
            probs,
            distribution,
            sample_stats: GroupStatistics::new(num_groups),
            unique_sample_stats: GroupStatistics::new(num_groups),
        })
    }

    /// Normalized probability vector
    pub fn probabilities(&self) -> &[f64] {
        &self.probs
    }
}

impl DataSource for GenerativeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Generative
    }

    fn num_groups(&self) -> usize {
        self.num_groups
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn draw(&mut self, rng: &mut dyn RngCore) -> Option<Sample> {
        let group = self.distribution.sample(rng);
        self.sample_stats.add(group);
        Some(Sample::new(group, rng.gen_range(0..PAYLOAD_SPACE)))
    }

    /// Only plain ground truth and plain sample estimates are defined here.
    /// Every other method falls back to the configured probability.
    fn probability(&self, group: usize, method: ProbabilityMethod, _prior_weight: f64) -> Option<f64> {
        match (method.estimate, method.exclude_claimed) {
            (Estimate::Sample, false) => self.sample_stats.point_probability(group, 0),
            _ => Some(self.probs[group]),
        }
    }

    fn ground_truth_weight(&self, group: usize) -> f64 {
        self.probs[group]
    }

    fn sample_stats(&self) -> &GroupStatistics {
        &self.sample_stats
    }

    fn unique_sample_stats(&self) -> &GroupStatistics {
        &self.unique_sample_stats
    }

    fn record_unique(&mut self, group: usize) {
        self.unique_sample_stats.add(group);
    }

    fn reset_sampling(&mut self) {
        self.sample_stats = GroupStatistics::new(self.num_groups);
        self.unique_sample_stats = GroupStatistics::new(self.num_groups);
    }
}

impl fmt::Display for GenerativeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{cost: {}, probs: {:?}}}", self.cost, self.probs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_weights_are_normalized() {
        let source = GenerativeSource::new(3, 1.0, &[2.0, 1.0, 1.0]).unwrap();
        assert_eq!(source.probabilities(), &[0.5, 0.25, 0.25]);
        assert_eq!(source.ground_truth_weight(0), 0.5);
    }

    #[test]
    fn test_rejects_bad_weights() {
        assert!(matches!(
            GenerativeSource::new(2, 1.0, &[1.0]),
            Err(Error::GroupCountMismatch { expected: 2, got: 1 })
        ));
        assert!(matches!(
            GenerativeSource::new(2, 1.0, &[0.0, 0.0]),
            Err(Error::InvalidWeights(_))
        ));
        assert!(matches!(
            GenerativeSource::new(2, 1.0, &[-0.5, 1.5]),
            Err(Error::InvalidWeights(_))
        ));
        assert!(matches!(
            GenerativeSource::new(2, f64::NAN, &[0.5, 0.5]),
            Err(Error::InvalidCost { .. })
        ));
    }

    #[test]
    fn test_draw_follows_distribution() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut source = GenerativeSource::new(2, 1.0, &[0.8, 0.2]).unwrap();
        let mut payloads = HashSet::new();
        for _ in 0..2000 {
            let sample = source.draw(&mut rng).unwrap();
            payloads.insert(sample);
        }
        assert_eq!(payloads.len(), 2000);
        let p = source.probability(0, ProbabilityMethod::sample(), 20.0).unwrap();
        assert!((p - 0.8).abs() < 0.05, "p={}", p);
    }

    #[test]
    fn test_zero_weight_group_never_drawn() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut source = GenerativeSource::new(3, 1.0, &[1.0, 0.0, 1.0]).unwrap();
        for _ in 0..500 {
            assert_ne!(source.draw(&mut rng).unwrap().group(), 1);
        }
        assert_eq!(source.sample_stats().count(1), 0);
    }

    #[test]
    fn test_unsupported_methods_fall_back_to_ground_truth() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut source = GenerativeSource::new(2, 1.0, &[0.8, 0.2]).unwrap();
        for _ in 0..10 {
            let sample = source.draw(&mut rng).unwrap();
            source.record_unique(sample.group());
        }
        for method in [
            ProbabilityMethod::ground_truth(),
            ProbabilityMethod::ground_truth().dedup(true),
            ProbabilityMethod::sample().dedup(true),
            ProbabilityMethod::bayes(),
            ProbabilityMethod::bayes().dedup(true),
        ] {
            assert_eq!(source.probability(1, method, 20.0), Some(0.2), "{}", method);
        }
    }

    #[test]
    fn test_sample_method_undefined_before_draws() {
        let source = GenerativeSource::new(2, 1.0, &[0.8, 0.2]).unwrap();
        assert_eq!(source.probability(0, ProbabilityMethod::sample(), 20.0), None);
    }

    #[test]
    fn test_reset_sampling() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut source = GenerativeSource::new(2, 3.0, &[0.5, 0.5]).unwrap();
        let sample = source.draw(&mut rng).unwrap();
        source.record_unique(sample.group());
        source.reset_sampling();
        assert_eq!(source.times_drawn(), 0);
        assert_eq!(source.unique_sample_stats().total(), 0);
        assert_eq!(source.cost(), 3.0);
        assert_eq!(source.probabilities(), &[0.5, 0.5]);
    }
}
