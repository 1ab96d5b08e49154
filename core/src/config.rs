//! Configuration for the Decision Engine
//!
//! [`EngineConfig`] holds the tunable parameters of a run. [`InstanceSpec`]
//! describes a whole decision problem (groups, sources, query) in a form
//! that can be read from TOML or JSON.
//!
//! ```toml
//! num_groups = 2
//! query = [10, 10]
//!
//! [engine]
//! seed = 42
//!
//! [[sources]]
//! kind = "generative"
//! cost = 1.0
//! weights = [0.9, 0.1]
//!
//! [[sources]]
//! kind = "finite"
//! cost = 2.0
//! samples = [{ group = 0, payload = 1 }, { group = 1, payload = 2 }]
//! ```

use crate::engine::{DecisionEngine, DecisionProblem};
use crate::error::{Error, Result};
use crate::sample::Sample;
use crate::source::{DataSource, FiniteSource, GenerativeSource};
use crate::stats::GroupStatistics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_prior_weight() -> f64 {
    20.0
}

/// Tunable parameters of the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Total weight of the Dirichlet prior used by Bayes-smoothed estimates
    #[serde(default = "default_prior_weight")]
    pub prior_weight: f64,

    /// Seed for the engine RNG (None = seeded from OS entropy)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prior_weight: default_prior_weight(),
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set Dirichlet prior weight
    pub fn with_prior_weight(mut self, prior_weight: f64) -> Self {
        self.prior_weight = prior_weight;
        self
    }
}

/// One sample of a finite source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub group: usize,
    pub payload: u64,
}

/// Description of one data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceSpec {
    /// Fixed distribution over groups; weights are normalized
    Generative { cost: f64, weights: Vec<f64> },
    /// Finite pool of samples
    Finite { cost: f64, samples: Vec<SampleSpec> },
}

impl SourceSpec {
    /// Construct the described source
    pub fn build(&self, num_groups: usize) -> Result<Box<dyn DataSource>> {
        match self {
            SourceSpec::Generative { cost, weights } => {
                Ok(Box::new(GenerativeSource::new(num_groups, *cost, weights)?))
            }
            SourceSpec::Finite { cost, samples } => {
                let samples = samples.iter().map(|s| Sample::new(s.group, s.payload));
                Ok(Box::new(FiniteSource::with_samples(num_groups, *cost, samples)?))
            }
        }
    }
}

/// Serializable description of a decision problem plus engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceSpec {
    pub num_groups: usize,
    /// Target count of distinct samples per group
    pub query: Vec<u64>,
    pub sources: Vec<SourceSpec>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl InstanceSpec {
    /// Parse from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse from JSON text
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.toml` or `.json` file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("reading {}", path.display()), e))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            _ => Err(Error::Config(format!(
                "unsupported instance file: {} (expected .toml or .json)",
                path.display()
            ))),
        }
    }

    /// Validate and construct the decision problem
    pub fn build(&self) -> Result<DecisionProblem> {
        let sources = self
            .sources
            .iter()
            .map(|spec| spec.build(self.num_groups))
            .collect::<Result<Vec<_>>>()?;
        let query = GroupStatistics::from_counts(self.query.clone());
        DecisionProblem::new(self.num_groups, sources, query)
    }

    /// Construct the problem and wrap it in an engine using the embedded settings
    pub fn into_engine(self) -> Result<DecisionEngine> {
        let problem = self.build()?;
        Ok(DecisionEngine::new(problem, self.engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceKind;
    use std::io::Write;
    use tempfile::Builder;

    const TOML_INSTANCE: &str = r#"
num_groups = 2
query = [3, 2]

[engine]
seed = 42
prior_weight = 10.0

[[sources]]
kind = "generative"
cost = 1.0
weights = [0.9, 0.1]

[[sources]]
kind = "finite"
cost = 2.0
samples = [{ group = 0, payload = 1 }, { group = 1, payload = 2 }, { group = 1, payload = 3 }]
"#;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.prior_weight, 20.0);
        assert!(config.seed.is_none());

        let config = config.with_seed(7).with_prior_weight(5.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.prior_weight, 5.0);
    }

    #[test]
    fn test_engine_config_defaults_when_omitted() {
        let spec = InstanceSpec::from_json_str(
            r#"{"num_groups": 1, "query": [1], "sources": [{"kind": "generative", "cost": 1.0, "weights": [1.0]}]}"#,
        )
        .unwrap();
        assert_eq!(spec.engine, EngineConfig::default());
    }

    #[test]
    fn test_parse_toml_and_build() {
        let spec = InstanceSpec::from_toml_str(TOML_INSTANCE).unwrap();
        assert_eq!(spec.engine.seed, Some(42));
        assert_eq!(spec.engine.prior_weight, 10.0);

        let problem = spec.build().unwrap();
        assert_eq!(problem.num_sources(), 2);
        assert_eq!(problem.sources()[0].kind(), SourceKind::Generative);
        assert_eq!(problem.sources()[1].kind(), SourceKind::Finite);
        assert_eq!(problem.sources()[1].ground_truth_weight(1), 2.0);
        assert_eq!(problem.query().counts(), &[3, 2]);
    }

    #[test]
    fn test_build_rejects_invalid_sources() {
        let spec = InstanceSpec {
            num_groups: 2,
            query: vec![1, 1],
            sources: vec![SourceSpec::Finite {
                cost: 1.0,
                samples: vec![SampleSpec { group: 5, payload: 0 }],
            }],
            engine: EngineConfig::default(),
        };
        assert!(matches!(spec.build(), Err(Error::GroupOutOfRange { group: 5, .. })));

        let spec = InstanceSpec {
            num_groups: 2,
            query: vec![1, 1],
            sources: Vec::new(),
            engine: EngineConfig::default(),
        };
        assert!(matches!(spec.build(), Err(Error::NoSources)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(TOML_INSTANCE.as_bytes()).unwrap();
        let spec = InstanceSpec::load(file.path()).unwrap();
        assert_eq!(spec.num_groups, 2);

        let json = serde_json::to_string(&spec).unwrap();
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        assert_eq!(InstanceSpec::load(file.path()).unwrap(), spec);
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let file = Builder::new().suffix(".yaml").tempfile().unwrap();
        assert!(matches!(InstanceSpec::load(file.path()), Err(Error::Config(_))));
        assert!(matches!(
            InstanceSpec::load(Path::new("/nonexistent/instance.toml")),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_into_engine_runs() {
        let mut engine = InstanceSpec::from_toml_str(TOML_INSTANCE)
            .unwrap()
            .into_engine()
            .unwrap();
        let outcome = engine.run_named("ratiocoll").unwrap();
        assert!(engine.problem().query().is_satisfied_by(&outcome.collected));
    }
}
