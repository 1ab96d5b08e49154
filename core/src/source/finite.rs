//! Finite-pool source - uniform draws from an owned collection of samples

use super::{DataSource, SourceKind};
use crate::error::{Error, Result};
use crate::sample::Sample;
use crate::stats::{Estimate, GroupStatistics, ProbabilityMethod};
use rand::seq::SliceRandom;
use rand::RngCore;
use std::fmt;

/// Data source backed by a finite pool of samples
///
/// Draws are with replacement, so the same sample can come back many
/// times. Ground truth is the group histogram of the pool.
#[derive(Debug, Clone)]
pub struct FiniteSource {
    num_groups: usize,
    cost: f64,
    samples: Vec<Sample>,
    ground_truth: GroupStatistics,
    sample_stats: GroupStatistics,
    unique_sample_stats: GroupStatistics,
}

impl FiniteSource {
    /// Create an empty pool
    pub fn new(num_groups: usize, cost: f64) -> Result<Self> {
        Error::check_cost(cost)?;
        Ok(Self {
            num_groups,
            cost,
            samples: Vec::new(),
            ground_truth: GroupStatistics::new(num_groups),
            sample_stats: GroupStatistics::new(num_groups),
            unique_sample_stats: GroupStatistics::new(num_groups),
        })
    }

    /// Create a pool and bulk-load it
    pub fn with_samples(
        num_groups: usize,
        cost: f64,
        samples: impl IntoIterator<Item = Sample>,
    ) -> Result<Self> {
        let mut source = Self::new(num_groups, cost)?;
        source.add_samples(samples)?;
        Ok(source)
    }

    /// Add one sample to the pool
    pub fn add_sample(&mut self, sample: Sample) -> Result<()> {
        Error::check_group(sample.group(), self.num_groups)?;
        self.ground_truth.add(sample.group());
        self.samples.push(sample);
        Ok(())
    }

    /// Add many samples to the pool
    pub fn add_samples(&mut self, samples: impl IntoIterator<Item = Sample>) -> Result<()> {
        for sample in samples {
            self.add_sample(sample)?;
        }
        Ok(())
    }

    /// Number of samples in the pool
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Pool count of `group`
    pub fn count(&self, group: usize) -> u64 {
        self.ground_truth.count(group)
    }

    /// Group histogram of the pool
    pub fn ground_truth(&self) -> &GroupStatistics {
        &self.ground_truth
    }

    /// Samples in insertion order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl DataSource for FiniteSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Finite
    }

    fn num_groups(&self) -> usize {
        self.num_groups
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn can_draw(&self) -> bool {
        !self.samples.is_empty()
    }

    fn draw(&mut self, rng: &mut dyn RngCore) -> Option<Sample> {
        let sample = *self.samples.choose(rng)?;
        self.sample_stats.add(sample.group());
        Some(sample)
    }

    fn probability(&self, group: usize, method: ProbabilityMethod, prior_weight: f64) -> Option<f64> {
        let excluded = if method.exclude_claimed {
            self.unique_sample_stats.count(group)
        } else {
            0
        };
        match method.estimate {
            Estimate::GroundTruth => self.ground_truth.point_probability(group, excluded),
            Estimate::Sample => self.sample_stats.point_probability(group, excluded),
            Estimate::Bayes => self.sample_stats.bayes_probability(group, prior_weight, excluded),
        }
    }

    fn ground_truth_weight(&self, group: usize) -> f64 {
        self.ground_truth.count(group) as f64
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

impl fmt::Display for FiniteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{cost: {}, size: {}, stats: {}}}",
            self.cost,
            self.len(),
            self.ground_truth
        )
    }
}
