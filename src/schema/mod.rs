//! Schema module - Configuration and reporting types for simulations.

mod config;
mod progress;

pub use config::*;
pub use progress::*;
