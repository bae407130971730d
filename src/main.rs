//! Learning Evo CLI - Run simulations from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use learning_evo::{compute::evolution::run_simulation, schema::SimulationConfig};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json>", args[0]);
        eprintln!();
        eprintln!("Evolve actor-critic learners from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Learning Evo Simulation");
    println!("=======================");
    println!(
        "Population: {} subpopulations x {} groups x {} individuals",
        config.subpopulations, config.groups_per_subpopulation, config.group_size
    );
    println!("Rounds per generation: {}", config.rounds);
    println!("Generations: {}", config.generations);
    println!("Output: {}", config.output.display());
    println!();

    let total = config.generations;
    let report_every = (total / 10).max(1);

    println!("Running simulation...");
    let start = Instant::now();

    // Print progress every 10%
    let result = run_simulation(config, |progress| {
        let done = progress.generation + 1;
        if done % report_every == 0 || progress.is_final() {
            println!(
                "  Generation {}/{}: payoff={:.6}, theta={:.6}, {:.1} gen/s",
                done,
                total,
                progress.mean_payoff,
                progress.mean_theta,
                done as f64 / progress.elapsed_seconds.max(f64::EPSILON)
            );
        }
    });

    let summary = result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let elapsed = start.elapsed();

    println!();
    println!("Final state:");
    println!("  Mean payoff: {:.6}", summary.final_mean_payoff);
    println!("  Individuals written: {}", summary.individuals_written);
    println!("  Workers: {}", summary.workers);
    println!("  Master seed: {}", summary.master_seed);
    println!();
    println!(
        "Time: {:.2}s ({:.2} gen/s)",
        elapsed.as_secs_f32(),
        summary.generations as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
