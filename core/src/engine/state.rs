//! Run-scoped state, created fresh for every run and dropped at its end

use crate::sample::Sample;
use crate::stats::GroupStatistics;
use std::collections::HashSet;

/// Mutable state of a single run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Payloads seen so far, across all sources
    pub seen: HashSet<Sample>,
    /// Distinct samples collected per group
    pub collected: GroupStatistics,
    /// Cost charged so far
    pub total_cost: f64,
    /// Rounds completed so far
    pub round: u64,
    /// Per-group UCB difficulty weights, fixed on the first round
    pub difficulty: Option<Vec<f64>>,
}

impl RunState {
    pub fn new(num_groups: usize) -> Self {
        Self {
            seen: HashSet::new(),
            collected: GroupStatistics::new(num_groups),
            total_cost: 0.0,
            round: 0,
            difficulty: None,
        }
    }

    /// Record a drawn sample, returning true if it was new
    pub fn observe(&mut self, sample: Sample) -> bool {
        if self.seen.insert(sample) {
            self.collected.add(sample.group());
            true
        } else {
            false
        }
    }
}
