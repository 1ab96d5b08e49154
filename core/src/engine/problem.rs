//! Decision-problem instance: groups, sources and the target query

use crate::error::{Error, Result};
use crate::source::DataSource;
use crate::stats::{GroupStatistics, ProbabilityMethod};
use std::fmt;

/// Cost of one unit of `group` from `source`: `cost / P(group | source)`
///
/// Zero or undefined probability means the source cannot supply the
/// group, which is scored as `+inf`.
pub fn unit_cost(
    source: &dyn DataSource,
    group: usize,
    method: ProbabilityMethod,
    prior_weight: f64,
) -> f64 {
    match source.probability(group, method, prior_weight) {
        Some(p) if p > 0.0 => source.cost() / p,
        _ => f64::INFINITY,
    }
}

/// Probability per unit cost `P(group | source) / cost`, with undefined read as zero
pub fn unit_yield(
    source: &dyn DataSource,
    group: usize,
    method: ProbabilityMethod,
    prior_weight: f64,
) -> f64 {
    let p = source
        .probability(group, method, prior_weight)
        .unwrap_or(0.0);
    p / source.cost()
}

/// One instance of the acquisition problem
#[derive(Debug)]
pub struct DecisionProblem {
    num_groups: usize,
    sources: Vec<Box<dyn DataSource>>,
    query: GroupStatistics,
}

impl DecisionProblem {
    /// Validate and assemble an instance
    ///
    /// Fails on zero sources, a source or query whose group count differs
    /// from `num_groups`, or a finite source with nothing to draw.
    pub fn new(
        num_groups: usize,
        sources: Vec<Box<dyn DataSource>>,
        query: GroupStatistics,
    ) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::NoSources);
        }
        if query.num_groups() != num_groups {
            return Err(Error::GroupCountMismatch {
                expected: num_groups,
                got: query.num_groups(),
            });
        }
        for (index, source) in sources.iter().enumerate() {
            if source.num_groups() != num_groups {
                return Err(Error::GroupCountMismatch {
                    expected: num_groups,
                    got: source.num_groups(),
                });
            }
            if !source.can_draw() {
                return Err(Error::EmptySource(index));
            }
        }
        Ok(Self {
            num_groups,
            sources,
            query,
        })
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn num_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn sources(&self) -> &[Box<dyn DataSource>] {
        &self.sources
    }

    pub(crate) fn sources_mut(&mut self) -> &mut [Box<dyn DataSource>] {
        &mut self.sources
    }

    /// Target count of distinct samples per group
    pub fn query(&self) -> &GroupStatistics {
        &self.query
    }

    /// Cheapest cost per unit of `group` across all sources
    pub fn group_score(&self, group: usize, method: ProbabilityMethod, prior_weight: f64) -> f64 {
        self.sources
            .iter()
            .map(|source| unit_cost(source.as_ref(), group, method, prior_weight))
            .fold(f64::INFINITY, f64::min)
    }

    /// Outstanding quota of `group` given the collected counts
    pub fn remaining_query(&self, group: usize, collected: &GroupStatistics) -> u64 {
        self.query.remaining(collected, group)
    }

    /// Groups whose quota is not yet met
    pub fn unsatisfied_groups(&self, collected: &GroupStatistics) -> Vec<usize> {
        (0..self.num_groups)
            .filter(|&g| self.query.count(g) > collected.count(g))
            .collect()
    }

    /// Groups with a positive quota that no source can ever produce
    pub fn unreachable_groups(&self) -> Vec<usize> {
        (0..self.num_groups)
            .filter(|&g| self.query.count(g) > 0)
            .filter(|&g| {
                self.sources
                    .iter()
                    .all(|s| s.ground_truth_weight(g) <= 0.0)
            })
            .collect()
    }

    /// Clear every source's running statistics
    pub fn reset_sampling(&mut self) {
        for source in self.sources.iter_mut() {
            source.reset_sampling();
        }
    }
}

impl fmt::Display for DecisionProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "query: {}", self.query)?;
        write!(f, "sources: [")?;
        for (i, source) in self.sources.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}(cost {})", source.kind(), source.cost())?;
        }
        write!(f, "]")
    }
}
