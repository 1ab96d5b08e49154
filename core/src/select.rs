//! Arg-max selection with uniform random tie-breaking
//!
//! Every "pick the best candidate" step in the engine goes through
//! [`argmax`], so group selection, source selection and UCB all break ties
//! the same way and consume randomness from the same RNG.

use rand::seq::SliceRandom;
use rand::RngCore;

/// Return the candidate with the highest score, ties broken uniformly at random
///
/// `+inf` is a valid score and ties with other `+inf` scores. `NaN` scores
/// never win. If no score is comparable (all `NaN`) the choice is uniform
/// over every candidate. Returns `None` only for an empty input.
pub fn argmax<K, I>(candidates: I, rng: &mut dyn RngCore) -> Option<K>
where
    K: Copy,
    I: IntoIterator<Item = (K, f64)>,
{
    let scored: Vec<(K, f64)> = candidates.into_iter().collect();
    let best = scored
        .iter()
        .map(|&(_, score)| score)
        .filter(|score| !score.is_nan())
        .fold(f64::NEG_INFINITY, f64::max);

    let winners: Vec<K> = scored
        .iter()
        .filter(|&&(_, score)| score >= best)
        .map(|&(key, _)| key)
        .collect();

    if winners.is_empty() {
        let all: Vec<K> = scored.iter().map(|&(key, _)| key).collect();
        return all.choose(rng).copied();
    }
    winners.choose(rng).copied()
}

/// Same as [`argmax`] over negated scores
pub fn argmin<K, I>(candidates: I, rng: &mut dyn RngCore) -> Option<K>
where
    K: Copy,
    I: IntoIterator<Item = (K, f64)>,
{
    argmax(candidates.into_iter().map(|(key, score)| (key, -score)), rng)
}
