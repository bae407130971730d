//! Genetic operators on a fixed number of continuous loci.
//!
//! # Random draw order
//!
//! Reproducibility of a run depends on the exact sequence in which these
//! operators consume the generator, so the order is part of their contract:
//!
//! - [`Gamete::mutate`]: loci in order `0..NUM_LOCI`. A locus with a positive
//!   mutation rate takes one uniform `[0, 1)` draw; if that draw is below the
//!   rate, the [`MutationShape`] increment draws follow immediately. Loci with
//!   a zero rate take no draws.
//! - [`Diplotype::gamete`]: one uniform draw for segregation at locus 0, then
//!   one uniform draw per locus `1..NUM_LOCI` for recombination, then the
//!   mutation draws of the new gamete.
//! - [`Haplotype::gamete`]: only the mutation draws.
//!
//! Increment shapes draw as follows: [`Rectangular`] one uniform, [`Gaussian`]
//! one standard normal, [`Laplace`] one Bernoulli sign then one unit exponential.

mod gamete;
mod genotype;
mod mutation;

pub use gamete::Gamete;
pub use genotype::{Diplotype, Genotype, Haplotype};
pub use mutation::{Gaussian, Laplace, MutationParams, MutationShape, Rectangular};
