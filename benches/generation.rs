//! Benchmarks for group learning and generation steps.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use learning_evo::{
    compute::{ActorCriticGroup, Phenotype, evolution::Simulation, genetics::Gaussian},
    schema::{GameConfig, LearningConfig, SimulationConfig},
};

fn bench_group_episode(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_episode");

    for rounds in [100, 500, 2000] {
        let members: Vec<Phenotype> = (0..4)
            .map(|i| Phenotype::from_value([0.0, 0.1 * i as f64, 0.0], true))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        group.bench_with_input(BenchmarkId::from_parameter(rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let mut acg = ActorCriticGroup::new(
                    GameConfig::default(),
                    LearningConfig::default(),
                    rounds,
                    members.clone(),
                );
                acg.interact(black_box(&mut rng));
                acg.into_members()
            });
        });
    }

    group.finish();
}

fn bench_generation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("generation_step");
    group.sample_size(20);

    for threads in [1, 2, 4] {
        let config = SimulationConfig {
            max_threads: threads,
            subpopulations: 8,
            groups_per_subpopulation: 25,
            group_size: 4,
            rounds: 100,
            generations: usize::MAX,
            random_seed: Some(1),
            ..Default::default()
        };
        let mut sim = match Simulation::new(config, Gaussian) {
            Ok(sim) => sim,
            Err(e) => panic!("cannot set up benchmark: {e}"),
        };

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{threads}_threads")),
            &threads,
            |b, _| {
                b.iter(|| black_box(sim.step()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_group_episode, bench_generation_step);
criterion_main!(benches);
