//! Progress reports and run summaries.

use serde::{Deserialize, Serialize};

/// State after one generation of interaction and learning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationProgress {
    /// Zero-based index of the generation just completed.
    pub generation: usize,
    pub total_generations: usize,
    /// Number of individuals that interacted this generation.
    pub individuals: usize,
    /// Mean per-round payoff over all individuals.
    pub mean_payoff: f64,
    /// Mean policy mean `theta` at the end of the generation.
    pub mean_theta: f64,
    /// Wall time since the run started.
    pub elapsed_seconds: f64,
}

impl GenerationProgress {
    /// Fraction of the run completed, in `(0, 1]`.
    pub fn fraction_done(&self) -> f64 {
        if self.total_generations == 0 {
            1.0
        } else {
            (self.generation + 1) as f64 / self.total_generations as f64
        }
    }

    pub fn is_final(&self) -> bool {
        self.generation + 1 >= self.total_generations
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub generations: usize,
    /// Individuals written to the output file.
    pub individuals_written: usize,
    /// Number of parallel workers.
    pub workers: usize,
    /// Seed all worker streams were derived from.
    pub master_seed: u64,
    pub final_mean_payoff: f64,
    pub elapsed_seconds: f64,
    /// Mean payoff of every generation, in order.
    pub mean_payoff_history: Vec<f64>,
}
