//! Closed-form Cost Estimates
//!
//! Analytic estimates of the expected acquisition cost, computed from the
//! ground truth of a [`DecisionProblem`] without simulating it:
//!
//! - Union bound: Σ_g target(g) · groupScore(g)
//! - Asymptotic estimate: q + √q · c, with c = Σ p*_g / √(2π · Π p*_g)
//!
//! Both are pure: no RNG, no mutation, bit-identical on repeated calls.

use crate::engine::DecisionProblem;
use crate::stats::ProbabilityMethod;
use std::f64::consts::PI;

/// Upper bound on expected cost: every group collected independently from its cheapest source
pub fn union_bound(problem: &DecisionProblem) -> f64 {
    let method = ProbabilityMethod::ground_truth();
    // Groups with no quota contribute nothing, even if unreachable
    (0..problem.num_groups())
        .filter(|&g| problem.query().count(g) > 0)
        .map(|g| problem.query().count(g) as f64 * problem.group_score(g, method, 0.0))
        .sum()
}

/// Best ground-truth probability of each group over all sources
pub fn optimal_probabilities(problem: &DecisionProblem) -> Vec<f64> {
    let method = ProbabilityMethod::ground_truth();
    (0..problem.num_groups())
        .map(|g| {
            problem
                .sources()
                .iter()
                .filter_map(|s| s.probability(g, method, 0.0))
                .fold(0.0, f64::max)
        })
        .collect()
}

/// Second-order estimate `q + √q · c` of the number of draws, with `q` the query total
pub fn asymptotic_estimate(problem: &DecisionProblem) -> f64 {
    let q = problem.query().total() as f64;
    let optimal = optimal_probabilities(problem);
    let sum: f64 = optimal.iter().sum();
    let product: f64 = optimal.iter().product();
    let c = sum / (2.0 * PI * product).sqrt();
    q + q.sqrt() * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{DataSource, GenerativeSource};
    use crate::stats::GroupStatistics;

    fn problem(query: Vec<u64>, cost: f64) -> DecisionProblem {
        let sources: Vec<Box<dyn DataSource>> = vec![
            Box::new(GenerativeSource::new(2, cost, &[0.75, 0.25]).unwrap()),
            Box::new(GenerativeSource::new(2, cost, &[0.5, 0.5]).unwrap()),
        ];
        DecisionProblem::new(2, sources, GroupStatistics::from_counts(query)).unwrap()
    }

    #[test]
    fn test_union_bound() {
        // Group 0: 2 / 0.75; group 1: 2 / 0.5
        let p = problem(vec![3, 4], 2.0);
        let expected = 3.0 * (2.0 / 0.75) + 4.0 * 4.0;
        assert!((union_bound(&p) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_optimal_probabilities() {
        let p = problem(vec![1, 1], 1.0);
        assert_eq!(optimal_probabilities(&p), vec![0.75, 0.5]);
    }

    #[test]
    fn test_asymptotic_estimate() {
        let p = problem(vec![50, 50], 1.0);
        let c = 1.25 / (2.0 * PI * 0.375).sqrt();
        let expected = 100.0 + 10.0 * c;
        assert!((asymptotic_estimate(&p) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_estimates_are_deterministic() {
        let p = problem(vec![17, 9], 1.5);
        assert_eq!(union_bound(&p).to_bits(), union_bound(&p).to_bits());
        assert_eq!(
            asymptotic_estimate(&p).to_bits(),
            asymptotic_estimate(&p).to_bits()
        );
    }

    #[test]
    fn test_unreachable_group_gives_infinite_bound() {
        let sources: Vec<Box<dyn DataSource>> =
            vec![Box::new(GenerativeSource::new(2, 1.0, &[1.0, 0.0]).unwrap())];
        let p = DecisionProblem::new(2, sources, GroupStatistics::from_counts(vec![1, 1])).unwrap();
        assert_eq!(union_bound(&p), f64::INFINITY);
        assert_eq!(asymptotic_estimate(&p), f64::INFINITY);
    }
}
