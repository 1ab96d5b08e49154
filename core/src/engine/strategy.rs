//! Per-round source selection for each [`Policy`]
//!
//! All functions read the problem and run state and return the index of
//! the source to draw from next. Every arg-max goes through
//! [`select::argmax`] with the engine's RNG.

use super::problem::{unit_yield, DecisionProblem};
use super::state::RunState;
use crate::policy::Policy;
use crate::select::argmax;
use crate::stats::ProbabilityMethod;
use rand::{Rng, RngCore};
use tracing::debug;

/// Choose the source for the current round
///
/// Warm-up policies visit every source once, in order, before their own
/// rule applies. UCB fixes its difficulty weights on round 0.
pub fn choose_source(
    policy: Policy,
    problem: &DecisionProblem,
    state: &mut RunState,
    prior_weight: f64,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    if policy == Policy::Ucb && state.round == 0 {
        let weights = difficulty_weights(problem);
        debug!(?weights, "ucb difficulty weights");
        state.difficulty = Some(weights);
    }
    if policy.has_warmup() && state.round < problem.num_sources() as u64 {
        return Some(state.round as usize);
    }

    let method = policy.probability_method();
    match policy {
        Policy::Random => uniform_source(problem, rng),
        Policy::CoupColl { .. } => greedy_source(problem, state, method?, prior_weight, false, rng),
        Policy::RatioColl { .. } => greedy_source(problem, state, method?, prior_weight, true, rng),
        Policy::EpsilonGreedy { .. } => {
            epsilon_greedy_source(problem, state, method?, prior_weight, rng)
        }
        Policy::Ucb => ucb_source(problem, state, rng),
        Policy::DualColl => dual_source(problem, state, method?, prior_weight, rng),
    }
}

fn uniform_source(problem: &DecisionProblem, rng: &mut dyn RngCore) -> Option<usize> {
    match problem.num_sources() {
        0 => None,
        n => Some(rng.gen_range(0..n)),
    }
}

/// Pick the hardest unsatisfied group, then the source with the best
/// probability per unit cost for it
///
/// With `weight_by_quota` the group score is multiplied by the group's
/// outstanding quota (RatioColl); without it the raw score is used (CoupColl).
fn greedy_source(
    problem: &DecisionProblem,
    state: &RunState,
    method: ProbabilityMethod,
    prior_weight: f64,
    weight_by_quota: bool,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    let group_scores = problem
        .unsatisfied_groups(&state.collected)
        .into_iter()
        .map(|g| {
            let score = problem.group_score(g, method, prior_weight);
            if weight_by_quota {
                (g, problem.remaining_query(g, &state.collected) as f64 * score)
            } else {
                (g, score)
            }
        });
    let group = argmax(group_scores, rng)?;
    best_source_for_group(problem, group, method, prior_weight, rng)
}

fn best_source_for_group(
    problem: &DecisionProblem,
    group: usize,
    method: ProbabilityMethod,
    prior_weight: f64,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    let yields = problem
        .sources()
        .iter()
        .enumerate()
        .map(|(i, source)| (i, unit_yield(source.as_ref(), group, method, prior_weight)));
    argmax(yields, rng)
}

/// Probability of exploring at round `t`: `(ln t / t)^(1/3)`
pub fn exploration_rate(t: u64) -> f64 {
    let t = t as f64;
    (t.ln() / t).powf(1.0 / 3.0)
}

fn epsilon_greedy_source(
    problem: &DecisionProblem,
    state: &RunState,
    method: ProbabilityMethod,
    prior_weight: f64,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    let r: f64 = rng.gen();
    if r <= exploration_rate(state.round) {
        debug!(round = state.round, "epsilon-greedy explores");
        uniform_source(problem, rng)
    } else {
        greedy_source(problem, state, method, prior_weight, true, rng)
    }
}

/// Per-group difficulty: total ground-truth mass over the group's mass
fn difficulty_weights(problem: &DecisionProblem) -> Vec<f64> {
    let group_mass: Vec<f64> = (0..problem.num_groups())
        .map(|g| {
            problem
                .sources()
                .iter()
                .map(|s| s.ground_truth_weight(g))
                .sum()
        })
        .collect();
    let total: f64 = group_mass.iter().sum();
    group_mass.iter().map(|mass| total / mass).collect()
}

/// Reward per unit cost plus a confidence bonus scaled by the reward range
///
/// Reads the difficulty weights fixed on round 0; without them no source
/// is chosen.
fn ucb_source(problem: &DecisionProblem, state: &RunState, rng: &mut dyn RngCore) -> Option<usize> {
    let difficulty = state.difficulty.as_deref()?;

    let unsatisfied = problem.unsatisfied_groups(&state.collected);
    let rewards: Vec<f64> = problem
        .sources()
        .iter()
        .map(|source| {
            let drawn = source.times_drawn() as f64;
            let bonus: f64 = unsatisfied
                .iter()
                .map(|&g| source.sample_stats().count(g) as f64 / difficulty[g])
                .sum();
            (1.0 + bonus) / (drawn * source.cost())
        })
        .collect();

    let max = rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = rewards.iter().copied().fold(f64::INFINITY, f64::min);
    let range = max - min;
    let log_t = (state.round as f64).ln();

    let bounds = problem.sources().iter().zip(&rewards).enumerate().map(|(i, (source, reward))| {
        let drawn = source.times_drawn() as f64;
        (i, reward + range * (2.0 * log_t / drawn).sqrt())
    });
    argmax(bounds, rng)
}

/// Score each source by the quota-weighted group scores it can serve
fn dual_source(
    problem: &DecisionProblem,
    state: &RunState,
    method: ProbabilityMethod,
    prior_weight: f64,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    let group_weights: Vec<(usize, f64)> = problem
        .unsatisfied_groups(&state.collected)
        .into_iter()
        .map(|g| {
            let remaining = problem.remaining_query(g, &state.collected) as f64;
            (g, remaining * problem.group_score(g, method, prior_weight))
        })
        .collect();

    let scores = problem.sources().iter().enumerate().map(|(i, source)| {
        let score: f64 = group_weights
            .iter()
            .filter_map(|&(g, weight)| match source.probability(g, method, prior_weight) {
                Some(p) if p > 0.0 => Some(p * weight),
                _ => None,
            })
            .sum();
        (i, score)
    });
    argmax(scores, rng)
}
