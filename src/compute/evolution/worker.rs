//! Parallel workers, each owning a fixed range of subpopulations.

use std::ops::Range;

use rand::Rng;
use rand::rngs::StdRng;

use super::reproduction::select_reproduce;
use crate::compute::actor_critic::ActorCriticGroup;
use crate::compute::genetics::{MutationParams, MutationShape};
use crate::compute::population::{PopulationContainer, SubPopulation};
use crate::schema::SimulationConfig;

/// Split `count` subpopulations over `workers` contiguous ranges.
///
/// Every range holds `count / workers` subpopulations except the last, which
/// also takes the remainder.
pub fn worker_ranges(count: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_worker = count / workers;
    (0..workers)
        .map(|w| {
            let start = w * per_worker;
            let end = if w + 1 == workers {
                count
            } else {
                start + per_worker
            };
            start..end
        })
        .collect()
}

/// Cut `slice` into disjoint mutable pieces, one per range.
///
/// The ranges must be contiguous and ascending, starting at zero, as produced
/// by [`worker_ranges`].
pub fn split_ranges_mut<'a, T>(
    mut slice: &'a mut [T],
    ranges: &[Range<usize>],
) -> Vec<&'a mut [T]> {
    let mut parts = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = std::mem::take(&mut slice).split_at_mut(range.len());
        parts.push(head);
        slice = tail;
    }
    parts
}

/// What one generation has to do, shared by all workers.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub config: &'a SimulationConfig,
    /// Draw fresh qualities before interaction.
    pub redraw_quality: bool,
    /// Produce offspring; false in the last generation.
    pub reproduce: bool,
}

/// Sums over the individuals a worker processed in one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationTally {
    pub individuals: usize,
    pub payoff: f64,
    pub theta: f64,
}

impl GenerationTally {
    pub fn merge(self, other: Self) -> Self {
        Self {
            individuals: self.individuals + other.individuals,
            payoff: self.payoff + other.payoff,
            theta: self.theta + other.theta,
        }
    }

    pub fn mean_payoff(&self) -> f64 {
        if self.individuals == 0 {
            0.0
        } else {
            self.payoff / self.individuals as f64
        }
    }

    pub fn mean_theta(&self) -> f64 {
        if self.individuals == 0 {
            0.0
        } else {
            self.theta / self.individuals as f64
        }
    }
}

/// A worker with its private random stream and mutation record.
#[derive(Debug, Clone)]
pub struct Worker<S> {
    pub id: usize,
    /// Subpopulations this worker owns for the whole run.
    pub range: Range<usize>,
    pub rng: StdRng,
    pub mutation: MutationParams<S>,
    scratch: SubPopulation,
}

impl<S: MutationShape> Worker<S> {
    pub fn new(
        id: usize,
        range: Range<usize>,
        rng: StdRng,
        mutation: MutationParams<S>,
        capacity: usize,
    ) -> Self {
        Self {
            id,
            range,
            rng,
            mutation,
            scratch: SubPopulation::new(capacity, 0),
        }
    }

    /// Interaction, learning and reproduction for the owned subpopulations.
    ///
    /// `current` and `next` are this worker's slices of the two
    /// metapopulations. Without reproduction the learned state is written back
    /// into `current` and `next` is left alone.
    pub fn run_generation(
        &mut self,
        ctx: &GenerationContext<'_>,
        current: &mut [SubPopulation],
        next: &mut [SubPopulation],
    ) -> GenerationTally {
        let config = ctx.config;
        let mut tally = GenerationTally::default();

        for (j, sp) in current.iter_mut().enumerate() {
            self.scratch.set_id(sp.id());
            self.scratch.refill(sp.iter().cloned());

            if ctx.redraw_quality {
                for ind in self.scratch.iter_mut() {
                    let q = config.qualities[self.rng.gen_range(0..config.qualities.len())];
                    ind.phenotype.set_quality(q);
                }
            }

            for group in self.scratch.as_mut_slice().chunks_mut(config.group_size) {
                let members = group.iter().map(|ind| ind.phenotype.clone()).collect();
                let mut acg =
                    ActorCriticGroup::new(config.game, config.learning, config.rounds, members);
                acg.interact(&mut self.rng);
                for (ind, phenotype) in group.iter_mut().zip(acg.into_members()) {
                    ind.phenotype = phenotype;
                }
            }

            for ind in self.scratch.iter() {
                tally.individuals += 1;
                tally.payoff += ind.phenotype.payoff;
                tally.theta += ind.phenotype.theta;
            }

            if ctx.reproduce {
                if let Some(offspring) = next.get_mut(j) {
                    select_reproduce(
                        self.scratch.as_slice(),
                        offspring,
                        &self.mutation,
                        &mut self.rng,
                    );
                }
            } else {
                sp.swap_members(&mut self.scratch);
            }
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_cover_without_overlap() {
        for count in 1..20 {
            for workers in 1..=count {
                let ranges = worker_ranges(count, workers);
                assert_eq!(ranges.len(), workers);
                let mut expected = 0;
                for range in &ranges {
                    assert_eq!(range.start, expected);
                    assert!(!range.is_empty());
                    expected = range.end;
                }
                assert_eq!(expected, count);
            }
        }
    }

    #[test]
    fn test_last_worker_takes_remainder() {
        assert_eq!(worker_ranges(10, 3), vec![0..3, 3..6, 6..10]);
        assert_eq!(worker_ranges(4, 4), vec![0..1, 1..2, 2..3, 3..4]);
    }

    #[test]
    fn test_split_ranges_mut_is_disjoint() {
        let mut values: Vec<usize> = vec![0; 10];
        let ranges = worker_ranges(10, 3);
        let parts = split_ranges_mut(&mut values, &ranges);
        for (w, part) in parts.into_iter().enumerate() {
            for v in part.iter_mut() {
                *v += w + 1;
            }
        }
        assert_eq!(values, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 3]);
    }

    #[test]
    fn test_tally_means() {
        let a = GenerationTally {
            individuals: 2,
            payoff: 3.0,
            theta: 1.0,
        };
        let b = GenerationTally {
            individuals: 2,
            payoff: 1.0,
            theta: 1.0,
        };
        let total = a.merge(b);
        assert_eq!(total.mean_payoff(), 1.0);
        assert_eq!(total.mean_theta(), 0.5);
        assert_eq!(GenerationTally::default().mean_payoff(), 0.0);
    }
}
