//! Tailor Core - Cost-aware Data Acquisition
//!
//! Given `m` groups, a target count of distinct samples per group (the
//! query) and a set of data sources that each charge a fixed cost per draw,
//! decide one draw at a time which source to sample next so that every
//! quota is met at low total cost.
//!
//! # Features
//!
//! - **GroupStatistics**: per-group counters with point and Bayes-smoothed estimates
//! - **DataSource**: finite-pool and generative sources behind one trait
//! - **DecisionEngine**: the sampling loop with global payload deduplication
//! - **Policies**: random, CoupColl, RatioColl, epsilon-greedy, UCB, DualColl
//! - **Estimators**: union bound and asymptotic cost estimates, no simulation
//!
//! # Example
//!
//! ```rust,ignore
//! use tailor_core::{union_bound, DecisionEngine, EngineConfig, InstanceSpec};
//!
//! let spec = InstanceSpec::load("instance.toml".as_ref())?;
//! let problem = spec.build()?;
//! println!("union bound: {:.1}", union_bound(&problem));
//!
//! let mut engine = DecisionEngine::new(problem, EngineConfig::default().with_seed(42));
//! let outcome = engine.run_named("ratiocoll-dupe")?;
//! println!("cost {:.1} in {} rounds", outcome.total_cost, outcome.rounds);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod policy;
pub mod sample;
pub mod select;
pub mod source;
pub mod stats;
pub mod synthetic;

// Re-exports for convenience
pub use config::{EngineConfig, InstanceSpec, SampleSpec, SourceSpec};
pub use engine::{DecisionEngine, DecisionProblem, RunOutcome, SourceUsage};
pub use error::{Error, Result};
pub use estimator::{asymptotic_estimate, optimal_probabilities, union_bound};
pub use policy::Policy;
pub use sample::Sample;
pub use select::argmax;
pub use source::{DataSource, FiniteSource, GenerativeSource, SourceKind};
pub use stats::{Estimate, GroupStatistics, ProbabilityMethod};
pub use synthetic::{synthetic_problem, CostModel};
