//! Learning Evo - evolution of actor-critic learners in a public goods game.
//!
//! Individuals carry three additive loci coding for an initial reward
//! estimate, an initial mean investment and a perception bias. Within a
//! generation, members of small groups learn their investment by actor-critic
//! reinforcement learning over repeated rounds. Between generations, parents
//! reproduce in proportion to their payoff and offspring are mixed over all
//! subpopulations.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration and progress types
//! - `compute`: Genetics, learning, population containers and the generation
//!   loop
//!
//! # Example
//!
//! ```rust,no_run
//! use learning_evo::{compute::evolution::run_simulation, schema::SimulationConfig};
//!
//! let config = SimulationConfig {
//!     generations: 10,
//!     random_seed: Some(1),
//!     ..Default::default()
//! };
//! let summary = run_simulation(config, |p| {
//!     println!("generation {}: mean payoff {:.4}", p.generation, p.mean_payoff);
//! })
//! .unwrap();
//! println!("final mean payoff: {:.4}", summary.final_mean_payoff);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{Simulation, SimulationError, run_simulation};
pub use compute::{ActorCriticGroup, Individual, Phenotype};
pub use schema::{GenerationProgress, SimulationConfig, SimulationSummary};
