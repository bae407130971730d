//! Fitness-proportional reproduction within a subpopulation.

use rand::Rng;
use rand::distributions::{Distribution, Uniform, WeightedIndex};

use crate::compute::genetics::{MutationParams, MutationShape};
use crate::compute::individual::Individual;
use crate::compute::population::{PopulationContainer, SubPopulation};

/// Parent sampler over a subpopulation.
enum ParentDraw {
    Weighted(WeightedIndex<f64>),
    /// Every weight is zero; parents are equally likely.
    Uniform(Uniform<usize>),
}

impl ParentDraw {
    fn new(parents: &[Individual]) -> Self {
        let weights = parents.iter().map(|ind| reproductive_weight(ind.phenotype.payoff));
        match WeightedIndex::new(weights) {
            Ok(dist) => Self::Weighted(dist),
            Err(_) => Self::Uniform(Uniform::new(0, parents.len())),
        }
    }

    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match self {
            Self::Weighted(dist) => dist.sample(rng),
            Self::Uniform(dist) => dist.sample(rng),
        }
    }
}

/// Payoff used as a reproduction weight. Negative and non-finite payoffs
/// give no chance of reproduction.
#[inline]
pub fn reproductive_weight(payoff: f64) -> f64 {
    if payoff.is_finite() && payoff > 0.0 {
        payoff
    } else {
        0.0
    }
}

/// Fill `offspring` to capacity with the young of `parents`.
///
/// Both parents of each offspring are drawn independently, with replacement,
/// with probability proportional to payoff. Per offspring the draws are the
/// mother's index, the father's index, the maternal gamete, then the paternal
/// gamete. Offspring belong to `offspring`'s subpopulation and carry group
/// and member tags of zero. Nothing is produced from an empty parent set.
pub fn select_reproduce<S, R>(
    parents: &[Individual],
    offspring: &mut SubPopulation,
    params: &MutationParams<S>,
    rng: &mut R,
) where
    S: MutationShape,
    R: Rng + ?Sized,
{
    offspring.clear();
    if parents.is_empty() {
        return;
    }
    let draw = ParentDraw::new(parents);
    let id = offspring.id();
    while !offspring.is_full() {
        let mother = &parents[draw.sample(rng)];
        let father = &parents[draw.sample(rng)];
        let maternal = mother.gamete(params, rng);
        let paternal = father.gamete(params, rng);
        offspring.add(Individual::from_gametes(maternal, paternal, id));
    }
}
