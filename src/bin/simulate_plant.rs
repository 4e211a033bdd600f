//! Drive a plant through caretaker actions
//!
//! Builds a plant, steps the canned state machine through a list of actions
//! and updates the plant after each step. Prints one JSON report per line.
//! The machine starts with 100 random past reads, one minute apart, unless
//! `--fresh` is given.
//!
//! Usage:
//!     simulate_plant [OPTIONS]
//!
//! Options:
//!     --seed <SEED>           Seed for plant generation (default: random)
//!     -a, --actions <LIST>    Comma-separated actions: water, light (default: none)
//!     -s, --start <STATE>     Initial state (default: healthy)
//!     -c, --config <FILE>     Plant recipe JSON
//!     --history <N>           Print the newest N history records at the end
//!     --fresh                 Start with an empty history
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use plant_twin::core::{RngSource, logging};
use plant_twin::plant::{LeafColor, Plant, PlantConfig};
use plant_twin::states::{Action, Condition, StateMachine};

fn print_help() {
    eprintln!("simulate_plant - Drive a plant through caretaker actions");
    eprintln!();
    eprintln!("Usage: simulate_plant [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    --seed <SEED>           Seed for plant generation (default: random)");
    eprintln!("    -a, --actions <LIST>    Comma-separated actions: water, light (default: none)");
    eprintln!("    -s, --start <STATE>     Initial state (default: healthy)");
    eprintln!("    -c, --config <FILE>     Plant recipe JSON");
    eprintln!("    --history <N>           Print the newest N history records at the end");
    eprintln!("    --fresh                 Start with an empty history");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    simulate_plant --seed 7 -s stressed -a light,water,water");
}

#[derive(Debug)]
struct Args {
    seed: Option<u64>,
    actions: Vec<Action>,
    start: Condition,
    config: Option<PathBuf>,
    history: Option<usize>,
    fresh: bool,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut seed: Option<u64> = None;
    let mut actions = Vec::new();
    let mut start = Condition::Healthy;
    let mut config: Option<PathBuf> = None;
    let mut history: Option<usize> = None;
    let mut fresh = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --seed".to_string());
                }
                seed = Some(args[i].parse().map_err(|_| format!("Invalid seed: {}", args[i]))?);
            }
            "-a" | "--actions" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --actions".to_string());
                }
                actions = args[i]
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| s.parse::<Action>().map_err(|e| e.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
            }
            "-s" | "--start" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --start".to_string());
                }
                start = args[i].parse().map_err(|e: plant_twin::states::StateError| e.to_string())?;
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config = Some(PathBuf::from(&args[i]));
            }
            "--history" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --history".to_string());
                }
                history = Some(args[i].parse().map_err(|_| format!("Invalid history count: {}", args[i]))?);
            }
            "--fresh" => {
                fresh = true;
            }
            arg => {
                return Err(format!("Unknown option: {}", arg));
            }
        }
        i += 1;
    }

    Ok(Args {
        seed,
        actions,
        start,
        config,
        history,
        fresh,
    })
}

#[derive(Serialize)]
struct StepReport {
    step: usize,
    action: Option<Action>,
    state: Condition,
    moisture: f32,
    light: f32,
    health_score: f32,
    leaf_color: LeafColor,
    main_leaves: usize,
    total_leaves: usize,
    branch_tilts: Vec<f32>,
}

impl StepReport {
    fn new(step: usize, action: Option<Action>, state: Condition, plant: &Plant) -> Self {
        Self {
            step,
            action,
            state,
            moisture: plant.moisture(),
            light: plant.light(),
            health_score: plant.health_score(),
            leaf_color: plant.leaf_color(),
            main_leaves: plant.main_stem().leaf_count(),
            total_leaves: plant.total_leaf_count(),
            branch_tilts: plant.branch_tilts(),
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => PlantConfig::load(path)?,
        None => PlantConfig::default(),
    };
    let mut plant = match args.seed {
        Some(seed) => Plant::with_config(config, RngSource::seeded(seed))?,
        None => Plant::with_config(config, RngSource::from_entropy())?,
    };
    let mut machine = if args.fresh {
        StateMachine::new(args.start)
    } else {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        StateMachine::with_random_history(args.start, &mut rng, now_ms())
    };
    log::debug!("Starting with {} history records", machine.history().len());

    let record = machine.current(now_ms());
    plant.update(record.moisture, record.light);
    println!("{}", serde_json::to_string(&StepReport::new(0, None, record.state, &plant))?);

    for (step, action) in args.actions.iter().enumerate() {
        machine.apply(*action, now_ms());
        let record = machine.current(now_ms());
        plant.update(record.moisture, record.light);
        let report = StepReport::new(step + 1, Some(*action), record.state, &plant);
        println!("{}", serde_json::to_string(&report)?);
    }

    if let Some(limit) = args.history {
        machine.history().write_json(std::io::stdout().lock(), limit)?;
        println!();
    }

    Ok(())
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    log::info!("Simulating {} actions from {}", args.actions.len(), args.start);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
