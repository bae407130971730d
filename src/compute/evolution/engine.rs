//! Generational orchestration.

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use thiserror::Error;

use super::migration::migrate;
use super::worker::{GenerationContext, GenerationTally, Worker, split_ranges_mut, worker_ranges};
use crate::compute::genetics::{
    Gamete, Gaussian, Laplace, MutationParams, MutationShape, Rectangular,
};
use crate::compute::individual::Individual;
use crate::compute::population::{Metapopulation, PopulationContainer, PopulationFileError};
use crate::schema::{
    ConfigError, GenerationProgress, IncrementShape, InitialPopulation, SimulationConfig,
    SimulationSummary,
};

/// Reasons a simulation cannot be set up or completed.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("starting population not valid: {0}")]
    Population(#[from] PopulationFileError),

    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "population layout ({found_subpopulations} x {found_capacity}) does not match configuration ({subpopulations} x {capacity})"
    )]
    LayoutMismatch {
        subpopulations: usize,
        capacity: usize,
        found_subpopulations: usize,
        found_capacity: usize,
    },
}

/// Evolution of actor-critic learners over a fixed number of generations.
///
/// Each generation every worker, in parallel, copies its subpopulations,
/// assigns qualities, runs every interaction group through its rounds, and
/// breeds the next generation in proportion to payoff. After all workers are
/// done, worker 0 shuffles the offspring over all subpopulations. The last
/// generation keeps its learned state instead of breeding.
///
/// The increment shape `S` is fixed for the run; [`run_simulation`] picks it
/// from the configuration.
pub struct Simulation<S = Gaussian> {
    config: SimulationConfig,
    population: Metapopulation,
    next_population: Metapopulation,
    workers: Vec<Worker<S>>,
    pool: rayon::ThreadPool,
    master_seed: u64,
    continue_generation: bool,
    generation: usize,
    mean_payoff_history: Vec<f64>,
}

impl<S: MutationShape> Simulation<S> {
    /// Validate the configuration, build the starting population, and set up
    /// the workers.
    pub fn new(config: SimulationConfig, shape: S) -> Result<Self, SimulationError> {
        config.validate()?;
        let population = match &config.initial {
            InitialPopulation::Uniform { alleles } => {
                uniform_population(&config, Gamete::new(*alleles))
            }
            InitialPopulation::File { path, .. } => {
                info!("reading starting population from {}", path.display());
                let mut population: Metapopulation =
                    Metapopulation::new(config.subpopulations, config.subpopulation_capacity());
                population.read_from_file(path, config.total_individuals())?;
                population
            }
        };
        Self::from_population(config, shape, population)
    }

    /// Start from an existing population, which must have the configured
    /// number of subpopulations and capacity.
    pub fn from_population(
        config: SimulationConfig,
        shape: S,
        mut population: Metapopulation,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let capacity = config.subpopulation_capacity();
        if population.len() != config.subpopulations || population.capacity() != capacity {
            return Err(SimulationError::LayoutMismatch {
                subpopulations: config.subpopulations,
                capacity,
                found_subpopulations: population.len(),
                found_capacity: population.capacity(),
            });
        }
        for (k, sp) in population.iter_mut().enumerate() {
            sp.set_id(k);
        }

        let worker_count = worker_count(config.max_threads, config.subpopulations);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("evo-worker-{i}"))
            .build()?;

        let master_seed = config.random_seed.unwrap_or_else(rand::random);
        let mut seeder = StdRng::seed_from_u64(master_seed);
        let mutation = MutationParams::new(shape, &config.mutation);
        let workers: Vec<Worker<S>> = worker_ranges(config.subpopulations, worker_count)
            .into_iter()
            .enumerate()
            .map(|(id, range)| {
                let seed = seeder.r#gen::<u64>();
                debug!("worker {id}: subpopulations {range:?}, seed {seed}");
                Worker::new(
                    id,
                    range,
                    StdRng::seed_from_u64(seed),
                    mutation.clone(),
                    capacity,
                )
            })
            .collect();

        info!(
            "{} subpopulations x {} groups x {} individuals, {} rounds, {} generations",
            config.subpopulations,
            config.groups_per_subpopulation,
            config.group_size,
            config.rounds,
            config.generations
        );
        info!("{worker_count} workers, master seed {master_seed}");

        let continue_generation = matches!(
            config.initial,
            InitialPopulation::File {
                continue_generation: true,
                ..
            }
        );

        Ok(Self {
            next_population: Metapopulation::new(config.subpopulations, capacity),
            config,
            population,
            workers,
            pool,
            master_seed,
            continue_generation,
            generation: 0,
            mean_payoff_history: Vec::new(),
        })
    }

    /// The current generation's population.
    pub fn population(&self) -> &Metapopulation {
        &self.population
    }

    /// Offspring staged by the last reproduction.
    pub fn next_population(&self) -> &Metapopulation {
        &self.next_population
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        self.generation >= self.config.generations
    }

    /// Run one generation. Does nothing once all generations are done.
    pub fn step(&mut self) -> Option<GenerationTally> {
        if self.is_finished() {
            return None;
        }
        let generation = self.generation;
        let reproduce = generation + 1 < self.config.generations;
        let ctx = GenerationContext {
            config: &self.config,
            redraw_quality: generation > 0 || !self.continue_generation,
            reproduce,
        };

        let ranges: Vec<_> = self.workers.iter().map(|w| w.range.clone()).collect();
        let current = split_ranges_mut(self.population.as_mut_slice(), &ranges);
        let next = split_ranges_mut(self.next_population.as_mut_slice(), &ranges);
        let workers = &mut self.workers;

        let tallies: Vec<GenerationTally> = self.pool.install(|| {
            workers
                .par_iter_mut()
                .zip(current)
                .zip(next)
                .map(|((worker, current), next)| worker.run_generation(&ctx, current, next))
                .collect()
        });
        // summed in worker order so the statistics do not depend on scheduling
        let tally = tallies
            .into_iter()
            .fold(GenerationTally::default(), GenerationTally::merge);

        if reproduce {
            if let Some(designated) = self.workers.first_mut() {
                migrate(
                    &mut self.population,
                    &self.next_population,
                    self.config.groups_per_subpopulation,
                    self.config.group_size,
                    &mut designated.rng,
                );
            }
        }

        debug!(
            "generation {}: mean payoff {:.6}, mean theta {:.6}",
            generation,
            tally.mean_payoff(),
            tally.mean_theta()
        );
        self.mean_payoff_history.push(tally.mean_payoff());
        self.generation += 1;
        Some(tally)
    }

    /// Run all remaining generations and write the final population.
    pub fn run_with_callback<F>(
        &mut self,
        callback: F,
    ) -> Result<SimulationSummary, SimulationError>
    where
        F: Fn(&GenerationProgress),
    {
        let start_time = Instant::now();
        while let Some(tally) = self.step() {
            callback(&GenerationProgress {
                generation: self.generation - 1,
                total_generations: self.config.generations,
                individuals: tally.individuals,
                mean_payoff: tally.mean_payoff(),
                mean_theta: tally.mean_theta(),
                elapsed_seconds: start_time.elapsed().as_secs_f64(),
            });
        }

        let output = &self.config.output;
        let individuals_written =
            self.population
                .write_to_file(output)
                .map_err(|source| SimulationError::Output {
                    path: output.clone(),
                    source,
                })?;
        info!("wrote {individuals_written} individuals to {}", output.display());

        Ok(SimulationSummary {
            generations: self.generation,
            individuals_written,
            workers: self.workers.len(),
            master_seed: self.master_seed,
            final_mean_payoff: self.mean_payoff_history.last().copied().unwrap_or(0.0),
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            mean_payoff_history: self.mean_payoff_history.clone(),
        })
    }

    /// Run to completion (blocking).
    pub fn run(&mut self) -> Result<SimulationSummary, SimulationError> {
        self.run_with_callback(|_| {})
    }
}

/// Build a simulation with the configured increment shape and run it.
pub fn run_simulation<F>(
    config: SimulationConfig,
    callback: F,
) -> Result<SimulationSummary, SimulationError>
where
    F: Fn(&GenerationProgress),
{
    match config.mutation.shape {
        IncrementShape::Rectangular => {
            Simulation::new(config, Rectangular)?.run_with_callback(callback)
        }
        IncrementShape::Normal => Simulation::new(config, Gaussian)?.run_with_callback(callback),
        IncrementShape::Laplace => Simulation::new(config, Laplace)?.run_with_callback(callback),
    }
}

/// Workers used for `subpopulations`: the thread cap (or the available
/// parallelism when the cap is 0), but never more than one per subpopulation.
pub fn worker_count(max_threads: usize, subpopulations: usize) -> usize {
    let cap = if max_threads == 0 {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    } else {
        max_threads
    };
    cap.min(subpopulations).max(1)
}

/// Every individual a copy of one homozygous founder, with 1-based group and
/// member tags.
fn uniform_population(config: &SimulationConfig, founder: Gamete) -> Metapopulation {
    let mut population: Metapopulation =
        Metapopulation::new(config.subpopulations, config.subpopulation_capacity());
    for (spn, sp) in population.iter_mut().enumerate() {
        for group in 1..=config.groups_per_subpopulation {
            for member in 1..=config.group_size {
                let mut ind = Individual::from_gamete(founder, spn);
                ind.phenotype.group = group;
                ind.phenotype.member = member;
                sp.add(ind);
            }
        }
    }
    population
}
