//! Error types for tailor-core.
//!
//! Everything here is a configuration error surfaced at construction or
//! parse time. An undefined probability estimate is not an error: it is
//! represented as `None` by the estimation methods.

use thiserror::Error;

/// Top-level error type for tailor-core.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown policy: {0}. Valid: random, coupcoll[-dupe|-nodupe], ratiocoll[-dupe|-nodupe], epsilon-exact[-dupe|-nodupe], epsilon-bayes[-dupe|-nodupe], ucb, dualcoll")]
    UnknownPolicy(String),

    #[error("Group {group} out of range for {num_groups} groups")]
    GroupOutOfRange { group: usize, num_groups: usize },

    #[error("Decision problem has no data sources")]
    NoSources,

    #[error("Group count mismatch: expected {expected}, got {got}")]
    GroupCountMismatch { expected: usize, got: usize },

    #[error("Data source {0} has no samples to draw from")]
    EmptySource(usize),

    #[error("Invalid cost: {cost} (must be finite and non-negative)")]
    InvalidCost { cost: f64 },

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Check a group index against the number of groups.
    pub fn check_group(group: usize, num_groups: usize) -> Result<()> {
        if group < num_groups {
            Ok(())
        } else {
            Err(Self::GroupOutOfRange { group, num_groups })
        }
    }

    /// Check that a per-draw cost is usable.
    pub fn check_cost(cost: f64) -> Result<()> {
        if cost.is_finite() && cost >= 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidCost { cost })
        }
    }
}

/// Result type alias for tailor-core.
pub type Result<T> = std::result::Result<T, Error>;
