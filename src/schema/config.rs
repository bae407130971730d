//! Configuration types for evolutionary actor-critic simulations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Number of genetically determined traits (w0, theta0, d), one locus each.
pub const NUM_LOCI: usize = 3;

/// One value per locus.
pub type LocusArray = [f64; NUM_LOCI];

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Upper bound on worker threads. Use 0 for the available parallelism.
    #[serde(default)]
    pub max_threads: usize,
    /// Number of subpopulations.
    pub subpopulations: usize,
    /// Number of interaction groups per subpopulation.
    pub groups_per_subpopulation: usize,
    /// Number of individuals in an interaction group.
    pub group_size: usize,
    /// Number of rounds of group interaction per generation.
    pub rounds: usize,
    /// Number of generations to simulate.
    pub generations: usize,
    /// Reward coefficients of the investment game.
    pub game: GameConfig,
    /// Actor-critic learning parameters.
    pub learning: LearningConfig,
    /// Discrete set of individual quality values.
    pub qualities: Vec<f64>,
    /// Mutation, segregation and recombination parameters.
    pub mutation: MutationConfig,
    /// Where the first generation comes from.
    pub initial: InitialPopulation,
    /// Output file for the final population.
    pub output: PathBuf,
    /// Master seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            subpopulations: 8,
            groups_per_subpopulation: 25,
            group_size: 4,
            rounds: 500,
            generations: 100,
            game: GameConfig::default(),
            learning: LearningConfig::default(),
            qualities: vec![0.5, 1.0, 1.5],
            mutation: MutationConfig::default(),
            initial: InitialPopulation::default(),
            output: PathBuf::from("population.tsv"),
            random_seed: None,
        }
    }
}

/// Coefficients of the public goods reward.
///
/// The group benefit is `B = b0 + b1*ā + b2*ā²/2` for mean action `ā`; an
/// individual with action `a` and quality `q` pays `(k1 + k11*a/2 + k12*q)*a`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GameConfig {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub k1: f64,
    pub k11: f64,
    pub k12: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            b0: 0.0,
            b1: 4.0,
            b2: -2.0,
            k1: 0.5,
            k11: 1.0,
            k12: -0.5,
        }
    }
}

impl GameConfig {
    /// Benefit shared by every group member, given the group's mean action.
    #[inline]
    pub fn benefit(&self, mean_action: f64) -> f64 {
        self.b0 + self.b1 * mean_action + 0.5 * self.b2 * mean_action * mean_action
    }

    /// Private cost of investing `action` for an individual of the given quality.
    #[inline]
    pub fn cost(&self, action: f64, quality: f64) -> f64 {
        (self.k1 + 0.5 * self.k11 * action + self.k12 * quality) * action
    }
}

/// Actor-critic learning parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LearningConfig {
    /// Standard deviation of the Gaussian action distribution.
    pub sigma: f64,
    /// Critic learning rate.
    pub alpha_w: f64,
    /// Actor learning rate.
    pub alpha_theta: f64,
    /// Decay of the actor's eligibility trace.
    pub lambda_theta: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            sigma: 0.1,
            alpha_w: 0.04,
            alpha_theta: 0.002,
            lambda_theta: 0.9,
        }
    }
}

/// Shape of standardized mutational increments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncrementShape {
    /// Uniform on `[-√3, √3)`.
    Rectangular,
    /// Standard normal.
    #[default]
    Normal,
    /// Laplace with variance one.
    Laplace,
}

/// Per-locus mutation and recombination parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MutationConfig {
    /// Distribution of mutational increments.
    #[serde(default)]
    pub shape: IncrementShape,
    /// Probability of mutation at each locus.
    pub rate: LocusArray,
    /// Standard deviation of mutational increments.
    pub sd: LocusArray,
    /// Largest allowed allelic value.
    pub max: LocusArray,
    /// Smallest allowed allelic value.
    pub min: LocusArray,
    /// `rho[0]` is the chance locus 0 comes from the maternal gamete,
    /// `rho[i]` the chance of a switch between loci `i-1` and `i`.
    pub rho: LocusArray,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            shape: IncrementShape::Normal,
            rate: [0.01; NUM_LOCI],
            sd: [0.02, 0.02, 0.02],
            max: [2.0, 2.0, 1.0],
            min: [-2.0, -2.0, -1.0],
            rho: [0.5; NUM_LOCI],
        }
    }
}

/// Source of the first generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum InitialPopulation {
    /// Every individual carries two copies of the same gamete.
    Uniform { alleles: LocusArray },
    /// Read a population written by a previous run.
    File {
        path: PathBuf,
        /// Keep the stored qualities for the first generation, continuing an
        /// interrupted generation instead of starting a new one.
        #[serde(default)]
        continue_generation: bool,
    },
}

impl Default for InitialPopulation {
    fn default() -> Self {
        Self::Uniform {
            alleles: [0.0, 0.25, 0.0],
        }
    }
}

impl SimulationConfig {
    /// Number of individuals held by each subpopulation.
    #[inline]
    pub fn subpopulation_capacity(&self) -> usize {
        self.groups_per_subpopulation * self.group_size
    }

    /// Number of individuals in the whole metapopulation.
    #[inline]
    pub fn total_individuals(&self) -> usize {
        self.subpopulations * self.subpopulation_capacity()
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.subpopulations == 0 || self.groups_per_subpopulation == 0 || self.group_size == 0
        {
            return Err(ConfigError::InvalidSizing);
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.qualities.is_empty() {
            return Err(ConfigError::NoQualities);
        }
        if !(self.learning.sigma.is_finite() && self.learning.sigma > 0.0) {
            return Err(ConfigError::InvalidSigma(self.learning.sigma));
        }

        let m = &self.mutation;
        for locus in 0..NUM_LOCI {
            if m.min[locus] > m.max[locus] {
                return Err(ConfigError::InvalidBounds {
                    locus,
                    min: m.min[locus],
                    max: m.max[locus],
                });
            }
            if !(0.0..=1.0).contains(&m.rate[locus]) {
                return Err(ConfigError::InvalidProbability {
                    name: "rate",
                    locus,
                    value: m.rate[locus],
                });
            }
            if !(0.0..=1.0).contains(&m.rho[locus]) {
                return Err(ConfigError::InvalidProbability {
                    name: "rho",
                    locus,
                    value: m.rho[locus],
                });
            }
            if m.sd[locus] < 0.0 {
                return Err(ConfigError::NegativeDeviation {
                    locus,
                    value: m.sd[locus],
                });
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Subpopulation count, groups per subpopulation and group size must be non-zero")]
    InvalidSizing,
    #[error("Number of generations must be non-zero")]
    NoGenerations,
    #[error("Quality value set must not be empty")]
    NoQualities,
    #[error("Action standard deviation must be positive, got {0}")]
    InvalidSigma(f64),
    #[error("Locus {locus}: minimum {min} exceeds maximum {max}")]
    InvalidBounds { locus: usize, min: f64, max: f64 },
    #[error("Locus {locus}: {name} = {value} is not a probability")]
    InvalidProbability {
        name: &'static str,
        locus: usize,
        value: f64,
    },
    #[error("Locus {locus}: mutational SD {value} is negative")]
    NegativeDeviation { locus: usize, value: f64 },
}
