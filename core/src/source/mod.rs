//! Data Sources
//!
//! A data source charges a fixed cost per draw and yields group-labelled
//! samples. Two shapes share the [`DataSource`] contract:
//!
//! - [`FiniteSource`] - owns a finite pool of samples and draws uniformly from it
//! - [`GenerativeSource`] - owns a probability vector and synthesizes fresh samples
//!
//! # Example
//!
//! ```rust,ignore
//! use tailor_core::source::{DataSource, GenerativeSource};
//! use tailor_core::ProbabilityMethod;
//!
//! let source = GenerativeSource::new(2, 1.0, &[0.8, 0.2])?;
//! assert_eq!(source.probability(0, ProbabilityMethod::ground_truth(), 20.0), Some(0.8));
//! ```

mod finite;
mod generative;

pub use finite::FiniteSource;
pub use generative::GenerativeSource;

use crate::sample::Sample;
use crate::stats::{GroupStatistics, ProbabilityMethod};
use rand::RngCore;
use std::fmt;

/// Shape of a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Finite pool of concrete samples
    Finite,
    /// Fixed distribution over groups, unbounded supply
    Generative,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite => write!(f, "finite"),
            Self::Generative => write!(f, "generative"),
        }
    }
}

/// Contract shared by every data source
///
/// Each source owns its running counters. The engine drives draws and
/// reports back which draws turned out to be new via
/// [`record_unique`](DataSource::record_unique).
pub trait DataSource: fmt::Debug + Send + Sync {
    /// Shape of this source
    fn kind(&self) -> SourceKind;

    /// Number of groups this source labels samples with
    fn num_groups(&self) -> usize;

    /// Cost charged for every draw, duplicate or not
    fn cost(&self) -> f64;

    /// Draw one sample and record it in [`sample_stats`](DataSource::sample_stats)
    ///
    /// Returns `None` only for a finite source with an empty pool.
    fn draw(&mut self, rng: &mut dyn RngCore) -> Option<Sample>;

    /// Estimate P(group | this source)
    ///
    /// Returns `None` when the counters behind the chosen method are still empty.
    fn probability(&self, group: usize, method: ProbabilityMethod, prior_weight: f64) -> Option<f64>;

    /// Static ground-truth mass of `group`
    ///
    /// Pool count for finite sources, configured probability for generative ones.
    fn ground_truth_weight(&self, group: usize) -> f64;

    /// Every draw of the current run, duplicates included
    fn sample_stats(&self) -> &GroupStatistics;

    /// Draws of the current run that were new to the engine
    fn unique_sample_stats(&self) -> &GroupStatistics;

    /// Note that a draw of `group` from this source was new to the engine
    fn record_unique(&mut self, group: usize);

    /// Clear both running trackers, leaving the pool/distribution and cost untouched
    fn reset_sampling(&mut self);

    /// Whether [`draw`](DataSource::draw) can produce a sample
    fn can_draw(&self) -> bool {
        true
    }

    /// Number of draws made in the current run
    fn times_drawn(&self) -> u64 {
        self.sample_stats().total()
    }
}
