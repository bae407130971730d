//! Compute module - genetics, learning and population dynamics.

mod actor_critic;
mod individual;
mod phenotype;

pub mod evolution;
pub mod genetics;
pub mod population;

pub use actor_critic::*;
pub use individual::*;
pub use phenotype::*;
