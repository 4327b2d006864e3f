//! Configuration System
//!
//! Loads model parameters and experiment settings from a TOML file.
//! Every section falls back to its defaults, so partial files are valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::GraphError;

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "vaxnet.toml";

/// Top-level configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub params: ModelParams,
    #[serde(default)]
    pub model: ModelOptions,
    #[serde(default)]
    pub run: RunOptions,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub seeding: SeedingConfig,
    #[serde(default)]
    pub experiment: ExperimentConfig,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every section and the cross-section seed counts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        self.run.validate()?;
        self.network.validate()?;
        self.experiment.validate()?;

        let population = self.network.nodes;
        let seeding = &self.seeding;
        for (what, requested) in [
            ("n_infecteds", seeding.n_infecteds),
            ("n_no_vax + n_pro_vax", seeding.n_no_vax + seeding.n_pro_vax),
        ] {
            if requested > population {
                return Err(ConfigError::SeedCountTooLarge {
                    what,
                    requested,
                    population,
                });
            }
        }
        if let Some(spread) = &seeding.awareness {
            check_probability("awareness.p_spread", spread.p_spread)?;
            if spread.seeds > seeding.n_no_vax {
                return Err(ConfigError::SeedCountTooLarge {
                    what: "awareness.seeds",
                    requested: spread.seeds,
                    population: seeding.n_no_vax,
                });
            }
        }
        Ok(())
    }
}

/// Transition probabilities, all in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Per-contact infection probability
    pub beta: f64,
    /// Recovery probability
    pub mu: f64,
    /// Vaccination probability for susceptible pro-vax nodes
    pub r: f64,
    /// Mass-media push toward pro-vax
    pub pro: f64,
    /// Rewiring probability of a disagreement edge
    pub pol: f64,
    /// Symptomatic conversion of infectious nodes to pro-vax
    pub p_sym: f64,
    /// Loss of immunity, used only with waning immunity
    pub gamma: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            beta: 0.15,
            mu: 0.1,
            r: 0.5,
            pro: 0.05,
            pol: 0.5,
            p_sym: 0.0,
            gamma: 0.0,
        }
    }
}

impl ModelParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("beta", self.beta),
            ("mu", self.mu),
            ("r", self.r),
            ("pro", self.pro),
            ("pol", self.pol),
            ("p_sym", self.p_sym),
            ("gamma", self.gamma),
        ] {
            check_probability(name, value)?;
        }
        Ok(())
    }
}

/// Structural model switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    pub opinion_model: OpinionModel,
    /// Recovered nodes return to susceptible with probability `gamma`
    pub waning_immunity: bool,
    /// Homophily rewiring of the information network
    pub rewiring: bool,
    /// Vaccinated nodes ignore their information neighbors
    pub vaccination_guard: bool,
    pub rewire_policy: RewirePolicy,
    pub neighbor_weighting: NeighborWeighting,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            opinion_model: OpinionModel::TwoState,
            waning_immunity: false,
            rewiring: true,
            vaccination_guard: true,
            rewire_policy: RewirePolicy::Densify,
            neighbor_weighting: NeighborWeighting::Opinionated,
        }
    }
}

/// Opinion state space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OpinionModel {
    /// Pro-vax / no-vax with voter-model contagion
    #[default]
    TwoState,
    /// Neutral / pro-vax / no-vax with neighbor-fraction contagion
    ThreeState,
}

/// What replaces a rewired disagreement edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RewirePolicy {
    /// Remove the edge, give each endpoint one new same-opinion edge (+1 edge)
    #[default]
    Densify,
    /// Remove the edge, give one random endpoint a same-opinion edge (edge count kept)
    DegreePreserving,
}

/// Denominator of the three-state adoption fractions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NeighborWeighting {
    /// `x + y`: only opinionated neighbors count
    #[default]
    Opinionated,
    /// `x + y + n`: neutral neighbors dilute adoption
    AllNeighbors,
}

/// Per-run settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub seed: u64,
    /// Hard cap on ticks; reaching it is reported as non-convergence
    pub max_ticks: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: 2022,
            max_ticks: 10_000,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_ticks == 0 {
            return Err(ConfigError::ZeroTickCap);
        }
        Ok(())
    }
}

/// Network generator choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    #[default]
    BarabasiAlbert,
    ErdosRenyi,
    Ring,
}

/// Network generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub generator: GeneratorKind,
    pub nodes: usize,
    pub ave_degree: f64,
    /// Generate a separate information network instead of copying the physical one
    pub independent_information: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorKind::BarabasiAlbert,
            nodes: 1000,
            ave_degree: 15.0,
            independent_information: false,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nodes == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if !self.ave_degree.is_finite() || self.ave_degree < 0.0 {
            return Err(ConfigError::InvalidDegree(self.ave_degree));
        }
        Ok(())
    }
}

/// Initial seed-set sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedingConfig {
    pub n_infecteds: usize,
    pub n_no_vax: usize,
    /// Explicit pro-vax seeds; only meaningful under the three-state model
    pub n_pro_vax: usize,
    /// Grow the no-vax set by SI spreading instead of uniform sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub awareness: Option<AwarenessSpread>,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            n_infecteds: 100,
            n_no_vax: 300,
            n_pro_vax: 0,
            awareness: None,
        }
    }
}

/// SI spreading used to grow a clustered no-vax seed set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwarenessSpread {
    /// Nodes aware before spreading starts
    pub seeds: usize,
    pub p_spread: f64,
}

impl Default for AwarenessSpread {
    fn default() -> Self {
        Self {
            seeds: 10,
            p_spread: 0.1,
        }
    }
}

/// Replicate and sweep settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub replicates: usize,
    pub master_seed: u64,
    pub r_values: Vec<f64>,
    pub pol_values: Vec<f64>,
    pub output_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        let grid: Vec<f64> = (1..10).map(|i| i as f64 / 10.0).collect();
        Self {
            replicates: 20,
            master_seed: 2022,
            r_values: grid.clone(),
            pol_values: grid,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &r in &self.r_values {
            check_probability("experiment.r_values", r)?;
        }
        for &pol in &self.pol_values {
            check_probability("experiment.pol_values", pol)?;
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),
    #[error("{name} = {value} is not a probability in [0, 1]")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("population is empty")]
    EmptyPopulation,
    #[error("average degree {0} must be finite and non-negative")]
    InvalidDegree(f64),
    #[error("{set} references node {node}, population is {population}")]
    SeedOutOfRange {
        set: &'static str,
        node: usize,
        population: usize,
    },
    #[error("{what} ({requested}) exceeds {population}")]
    SeedCountTooLarge {
        what: &'static str,
        requested: usize,
        population: usize,
    },
    #[error("node {node} is seeded both pro-vax and no-vax")]
    OverlappingSeeds { node: usize },
    #[error("{network} network: {source}")]
    Graph {
        network: &'static str,
        #[source]
        source: GraphError,
    },
    #[error("max_ticks must be at least 1")]
    ZeroTickCap,
}
