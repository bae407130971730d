//! Generational orchestration of the evolving learners.
//!
//! # Overview
//!
//! - **Workers** (`worker`): static partition of subpopulations over a fixed
//!   pool, each worker with a private random stream and mutation record
//! - **Reproduction** (`reproduction`): payoff-proportional choice of parents
//! - **Migration** (`migration`): global shuffle of offspring between
//!   generations
//! - **Engine** (`engine`): the generation loop, progress reporting and
//!   output
//!
//! # Example
//!
//! ```rust,no_run
//! use learning_evo::compute::evolution::Simulation;
//! use learning_evo::compute::genetics::Gaussian;
//! use learning_evo::schema::SimulationConfig;
//!
//! let config = SimulationConfig::default();
//! let mut sim = Simulation::new(config, Gaussian).unwrap();
//! let summary = sim
//!     .run_with_callback(|progress| {
//!         println!(
//!             "Generation {}: mean payoff = {:.3}",
//!             progress.generation, progress.mean_payoff
//!         );
//!     })
//!     .unwrap();
//! println!("Wrote {} individuals", summary.individuals_written);
//! ```

mod engine;
mod migration;
mod reproduction;
mod worker;

pub use engine::{Simulation, SimulationError, run_simulation, worker_count};
pub use migration::migrate;
pub use reproduction::{reproductive_weight, select_reproduce};
pub use worker::{GenerationContext, GenerationTally, Worker, split_ranges_mut, worker_ranges};
