//! Standardized mutational increments and the per-locus mutation record.

use std::f64::consts::SQRT_2;

use rand::Rng;
use rand_distr::{Exp1, StandardNormal};

use crate::schema::{LocusArray, MutationConfig, NUM_LOCI};

/// Half-width of a uniform distribution with unit variance.
const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Generator of standardized (mean zero, variance one) mutational increments.
///
/// The shape is a type parameter of everything that mutates, so it is fixed
/// when a simulation is built rather than chosen per call.
pub trait MutationShape: Clone + Send + Sync {
    fn std_incr<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;
}

/// Rectangular increments, uniform on `[-√3, √3)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rectangular;

impl MutationShape for Rectangular {
    #[inline]
    fn std_incr<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(-SQRT_3..SQRT_3)
    }
}

/// Normally distributed increments.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gaussian;

impl MutationShape for Gaussian {
    #[inline]
    fn std_incr<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.sample(StandardNormal)
    }
}

/// Laplace (two-sided exponential) increments with rate √2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Laplace;

impl MutationShape for Laplace {
    #[inline]
    fn std_incr<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let positive = rng.gen_bool(0.5);
        let magnitude = rng.sample::<f64, _>(Exp1) / SQRT_2;
        if positive { magnitude } else { -magnitude }
    }
}

/// Parameters for mutation, segregation and recombination.
///
/// Each worker owns its own copy; the generator is passed separately to the
/// operators so the record itself is plain data.
#[derive(Debug, Clone)]
pub struct MutationParams<S> {
    /// Increment distribution.
    pub shape: S,
    /// Probability of mutation at each locus.
    pub rate: LocusArray,
    /// Standard deviation of mutational increments.
    pub sd: LocusArray,
    /// Upper bound of allelic values.
    pub max: LocusArray,
    /// Lower bound of allelic values.
    pub min: LocusArray,
    /// Segregation (`rho[0]`) and recombination (`rho[1..]`) probabilities.
    pub rho: LocusArray,
}

impl<S: MutationShape> MutationParams<S> {
    /// Build from configuration with the given increment shape.
    pub fn new(shape: S, config: &MutationConfig) -> Self {
        Self {
            shape,
            rate: config.rate,
            sd: config.sd,
            max: config.max,
            min: config.min,
            rho: config.rho,
        }
    }

    /// Record that never mutates and uses Mendelian segregation with free
    /// recombination; bounds are unlimited.
    pub fn neutral(shape: S) -> Self {
        Self {
            shape,
            rate: [0.0; NUM_LOCI],
            sd: [0.0; NUM_LOCI],
            max: [f64::INFINITY; NUM_LOCI],
            min: [f64::NEG_INFINITY; NUM_LOCI],
            rho: [0.5; NUM_LOCI],
        }
    }

    /// Use the same mutation rate at every locus.
    pub fn with_uniform_rate(mut self, rate: f64) -> Self {
        self.rate = [rate; NUM_LOCI];
        self
    }

    /// Use the same recombination probability at every locus.
    pub fn with_uniform_rho(mut self, rho: f64) -> Self {
        self.rho = [rho; NUM_LOCI];
        self
    }

    /// Draw one standardized increment.
    #[inline]
    pub fn std_incr<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.shape.std_incr(rng)
    }
}
