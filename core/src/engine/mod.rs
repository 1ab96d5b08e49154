//! Decision Engine
//!
//! Drives the acquisition loop: each round the active [`Policy`] picks a
//! source, one sample is drawn, new payloads count toward the query, and the
//! source's cost is charged whether or not the draw was a duplicate. The
//! loop ends as soon as the query is satisfied.
//!
//! # Example
//!
//! ```rust,ignore
//! use tailor_core::{DecisionEngine, DecisionProblem, EngineConfig, GroupStatistics, Policy};
//! use tailor_core::source::GenerativeSource;
//!
//! let sources = vec![
//!     Box::new(GenerativeSource::new(2, 1.0, &[0.9, 0.1])?) as Box<_>,
//!     Box::new(GenerativeSource::new(2, 1.0, &[0.1, 0.9])?) as Box<_>,
//! ];
//! let problem = DecisionProblem::new(2, sources, GroupStatistics::from_counts(vec![10, 10]))?;
//! let mut engine = DecisionEngine::new(problem, EngineConfig::default().with_seed(7));
//! let outcome = engine.run(Policy::RatioColl { dupe: false })?;
//! println!("cost {} after {} rounds", outcome.total_cost, outcome.rounds);
//! ```

mod problem;
mod state;
mod strategy;

pub use problem::{unit_cost, unit_yield, DecisionProblem};
pub use state::RunState;
pub use strategy::exploration_rate;

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::source::SourceKind;
use crate::stats::GroupStatistics;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Per-source counters at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceUsage {
    pub kind: SourceKind,
    pub cost: f64,
    /// Every draw, duplicates included
    pub draws: GroupStatistics,
    /// Draws that were new to the engine
    pub unique: GroupStatistics,
}

impl SourceUsage {
    /// Cost charged to this source
    pub fn spent(&self) -> f64 {
        self.cost * self.draws.total() as f64
    }
}

/// Result of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub policy: Policy,
    pub total_cost: f64,
    pub rounds: u64,
    /// Distinct samples collected per group
    pub collected: GroupStatistics,
    pub per_source: Vec<SourceUsage>,
}

impl RunOutcome {
    /// Average cost per round, zero for a run with no rounds
    pub fn cost_per_round(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.total_cost / self.rounds as f64
        }
    }
}

/// Runs policies against one [`DecisionProblem`]
///
/// The engine owns the problem and a single RNG used for every draw and
/// every tie-break. Each run resets all run-scoped state first, so runs
/// are independent of each other.
#[derive(Debug)]
pub struct DecisionEngine {
    problem: DecisionProblem,
    config: EngineConfig,
    rng: StdRng,
}

impl DecisionEngine {
    /// Create an engine; a configured seed makes its run sequence reproducible
    pub fn new(problem: DecisionProblem, config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            problem,
            config,
            rng,
        }
    }

    pub fn problem(&self) -> &DecisionProblem {
        &self.problem
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Give back the problem
    pub fn into_problem(self) -> DecisionProblem {
        self.problem
    }

    /// Parse a policy identifier and run it
    pub fn run_named(&mut self, policy: &str) -> Result<RunOutcome> {
        let policy: Policy = policy.parse()?;
        self.run(policy)
    }

    /// Run `policy` until the query is satisfied
    ///
    /// An instance with a group no source can produce never terminates;
    /// that is logged but not prevented.
    pub fn run(&mut self, policy: Policy) -> Result<RunOutcome> {
        self.problem.reset_sampling();
        let mut state = RunState::new(self.problem.num_groups());

        let unreachable = self.problem.unreachable_groups();
        if !unreachable.is_empty() {
            warn!(?unreachable, %policy, "groups with a positive quota have no source that can produce them");
        }
        debug!(
            %policy,
            sources = self.problem.num_sources(),
            groups = self.problem.num_groups(),
            query_total = self.problem.query().total(),
            "run started"
        );

        while !self.problem.query().is_satisfied_by(&state.collected) {
            let index = strategy::choose_source(
                policy,
                &self.problem,
                &mut state,
                self.config.prior_weight,
                &mut self.rng,
            )
            .ok_or_else(|| Error::Internal(format!("{} selected no source", policy)))?;

            let source = &mut self.problem.sources_mut()[index];
            let sample = source.draw(&mut self.rng).ok_or(Error::EmptySource(index))?;
            let is_new = state.observe(sample);
            if is_new {
                source.record_unique(sample.group());
            }
            state.total_cost += source.cost();
            state.round += 1;

            trace!(round = state.round, source = index, group = sample.group(), is_new, "draw");
        }

        debug!(%policy, total_cost = state.total_cost, rounds = state.round, "run satisfied");
        Ok(self.outcome(policy, state))
    }

    fn outcome(&self, policy: Policy, state: RunState) -> RunOutcome {
        let per_source = self
            .problem
            .sources()
            .iter()
            .map(|source| SourceUsage {
                kind: source.kind(),
                cost: source.cost(),
                draws: source.sample_stats().clone(),
                unique: source.unique_sample_stats().clone(),
            })
            .collect();
        RunOutcome {
            policy,
            total_cost: state.total_cost,
            rounds: state.round,
            collected: state.collected,
            per_source,
        }
    }
}
