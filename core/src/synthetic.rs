//! Synthetic Instances
//!
//! Helpers for building random decision problems out of generative sources:
//! cost assignment under a [`CostModel`], random probability splits, and
//! probability tables in which every group is well covered by some source
//! (optionally with one minority group).

use crate::engine::DecisionProblem;
use crate::error::{Error, Result};
use crate::source::{DataSource, GenerativeSource};
use crate::stats::GroupStatistics;
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Pareto};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How per-draw costs are assigned to sources, each with mean close to 1
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostModel {
    /// Every source costs 1.0
    #[default]
    Uniform,
    /// Uniform on (0, 2]
    Random,
    /// Heavy-tailed Lomax(α = 2)
    Skewed,
}

impl fmt::Display for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Random => write!(f, "random"),
            Self::Skewed => write!(f, "skewed"),
        }
    }
}

impl FromStr for CostModel {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "random" => Ok(Self::Random),
            "skewed" | "pareto" => Ok(Self::Skewed),
            _ => Err(Error::Config(format!(
                "Unknown cost model: {}. Valid: uniform, random, skewed",
                s
            ))),
        }
    }
}

impl CostModel {
    /// Draw `n` strictly positive costs
    pub fn assign(&self, n: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>> {
        match self {
            CostModel::Uniform => Ok(vec![1.0; n]),
            CostModel::Random => Ok((0..n).map(|_| 2.0 * (1.0 - rng.gen::<f64>())).collect()),
            CostModel::Skewed => {
                // Pareto(1, 2) - 1 is Lomax(2), whose mean is 1
                let pareto: Pareto<f64> =
                    Pareto::new(1.0, 2.0).map_err(|e| Error::Config(e.to_string()))?;
                Ok((0..n)
                    .map(|_| (pareto.sample(rng) - 1.0).max(f64::MIN_POSITIVE))
                    .collect())
            }
        }
    }
}

/// Split `total` into `n` strictly positive random parts
pub fn random_split(total: f64, n: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    let parts: Vec<f64> = (0..n).map(|_| 1.0 - rng.gen::<f64>()).collect();
    let sum: f64 = parts.iter().sum();
    parts.into_iter().map(|x| x * total / sum).collect()
}

/// Build an `n × m` table of per-source group probabilities
///
/// Groups are dealt round-robin to sources, and each dealt group gets
/// probability `1/m` in its source; the remaining mass of each row is
/// split at random over the groups not yet set. With `majority = false`
/// group 0 is a minority group: it gets a probability in (0, 1/m] in
/// every source and is never dealt. A single group always gets the whole row.
pub fn probability_table(n: usize, m: usize, majority: bool, rng: &mut dyn RngCore) -> Result<Vec<Vec<f64>>> {
    if n == 0 {
        return Err(Error::NoSources);
    }
    if m == 0 {
        return Err(Error::Config("probability table needs at least one group".to_string()));
    }
    if m == 1 {
        return Ok(vec![vec![1.0]; n]);
    }
    let share = 1.0 / m as f64;
    let mut table = vec![vec![0.0; m]; n];

    let start = if majority {
        0
    } else {
        for row in table.iter_mut() {
            row[0] = (1.0 - rng.gen::<f64>()) * share;
        }
        1
    };

    for (dealt, group) in (start..m).enumerate() {
        let row = &mut table[dealt % n];
        let nonzero = row.iter().filter(|&&p| p != 0.0).count();
        row[group] = if nonzero == m - 1 {
            1.0 - row.iter().sum::<f64>()
        } else {
            share
        };
    }

    for row in table.iter_mut() {
        let unset: Vec<usize> = (0..m).filter(|&g| row[g] == 0.0).collect();
        if unset.is_empty() {
            continue;
        }
        let remaining = (1.0 - row.iter().sum::<f64>()).max(0.0);
        let split = random_split(remaining, unset.len(), rng);
        for (g, p) in unset.into_iter().zip(split) {
            row[g] = p;
        }
    }
    Ok(table)
}

/// Random instance of `n` generative sources over `m` groups, each group targeting `per_group`
pub fn synthetic_problem(
    n: usize,
    m: usize,
    majority: bool,
    cost_model: CostModel,
    per_group: u64,
    rng: &mut dyn RngCore,
) -> Result<DecisionProblem> {
    let table = probability_table(n, m, majority, rng)?;
    let costs = cost_model.assign(n, rng)?;
    let sources = table
        .iter()
        .zip(costs)
        .map(|(probs, cost)| {
            GenerativeSource::new(m, cost, probs).map(|s| Box::new(s) as Box<dyn DataSource>)
        })
        .collect::<Result<Vec<_>>>()?;
    DecisionProblem::new(m, sources, GroupStatistics::uniform(m, per_group))
}
