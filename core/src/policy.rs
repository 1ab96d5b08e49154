//! Selection Policies
//!
//! Identifies which rule the engine uses to pick the next source:
//!
//! - `random` - uniform over sources
//! - `coupcoll` - hardest unsatisfied group first, then its cheapest source
//! - `ratiocoll` - like coupcoll, with group hardness weighted by remaining quota
//! - `epsilon-exact` / `epsilon-bayes` - ratiocoll on running estimates, with decaying exploration
//! - `ucb` - upper confidence bound over per-source rewards
//! - `dualcoll` - one score per source, summed over the quota-weighted groups
//!
//! The greedy and epsilon-greedy families take a `-dupe` / `-nodupe` suffix
//! that turns the duplicate correction of their probability estimates on or off.

use crate::error::Error;
use crate::stats::ProbabilityMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Source selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Policy {
    Random,
    CoupColl { dupe: bool },
    RatioColl { dupe: bool },
    EpsilonGreedy { bayes: bool, dupe: bool },
    Ucb,
    DualColl,
}

impl Policy {
    /// Every policy variant
    pub const ALL: [Policy; 11] = [
        Policy::Random,
        Policy::CoupColl { dupe: false },
        Policy::CoupColl { dupe: true },
        Policy::RatioColl { dupe: false },
        Policy::RatioColl { dupe: true },
        Policy::EpsilonGreedy { bayes: false, dupe: false },
        Policy::EpsilonGreedy { bayes: false, dupe: true },
        Policy::EpsilonGreedy { bayes: true, dupe: false },
        Policy::EpsilonGreedy { bayes: true, dupe: true },
        Policy::Ucb,
        Policy::DualColl,
    ];

    /// Whether the policy visits every source once before deciding
    pub fn has_warmup(&self) -> bool {
        matches!(self, Policy::EpsilonGreedy { .. } | Policy::Ucb)
    }

    /// Probability method used to score groups and sources, if any
    pub fn probability_method(&self) -> Option<ProbabilityMethod> {
        match *self {
            Policy::CoupColl { dupe } | Policy::RatioColl { dupe } => {
                Some(ProbabilityMethod::ground_truth().dedup(dupe))
            }
            Policy::EpsilonGreedy { bayes: false, dupe } => {
                Some(ProbabilityMethod::sample().dedup(dupe))
            }
            Policy::EpsilonGreedy { bayes: true, dupe } => {
                Some(ProbabilityMethod::bayes().dedup(dupe))
            }
            Policy::DualColl => Some(ProbabilityMethod::ground_truth()),
            Policy::Random | Policy::Ucb => None,
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = |dupe: bool| if dupe { "dupe" } else { "nodupe" };
        match *self {
            Policy::Random => write!(f, "random"),
            Policy::CoupColl { dupe } => write!(f, "coupcoll-{}", suffix(dupe)),
            Policy::RatioColl { dupe } => write!(f, "ratiocoll-{}", suffix(dupe)),
            Policy::EpsilonGreedy { bayes, dupe } => {
                let estimate = if bayes { "bayes" } else { "exact" };
                write!(f, "epsilon-{}-{}", estimate, suffix(dupe))
            }
            Policy::Ucb => write!(f, "ucb"),
            Policy::DualColl => write!(f, "dualcoll"),
        }
    }
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        let (base, dupe) = match lowered.strip_suffix("-nodupe") {
            Some(base) => (base, false),
            None => match lowered.strip_suffix("-dupe") {
                Some(base) => (base, true),
                None => (lowered.as_str(), false),
            },
        };
        let suffixed = base.len() != lowered.len();

        let policy = match base {
            "random" if !suffixed => Policy::Random,
            "ucb" if !suffixed => Policy::Ucb,
            "dualcoll" if !suffixed => Policy::DualColl,
            "coupcoll" => Policy::CoupColl { dupe },
            "ratiocoll" => Policy::RatioColl { dupe },
            "epsilon-exact" => Policy::EpsilonGreedy { bayes: false, dupe },
            "epsilon-bayes" => Policy::EpsilonGreedy { bayes: true, dupe },
            _ => return Err(Error::UnknownPolicy(s.to_string())),
        };
        Ok(policy)
    }
}

impl TryFrom<String> for Policy {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Policy> for String {
    fn from(policy: Policy) -> Self {
        policy.to_string()
    }
}
