//! Export a posed plant as a Wavefront OBJ snapshot
//!
//! Usage:
//!     export_plant [OPTIONS] <OUTPUT.obj>
//!
//! Options:
//!     --seed <SEED>           Seed for plant generation (default: 12345)
//!     -m, --moisture <M>      Moisture level 0-100 (default: recipe initial)
//!     -l, --light <L>         Light level in lux (default: recipe initial)
//!     -c, --config <FILE>     Plant recipe JSON
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use plant_twin::core::{RngSource, logging};
use plant_twin::plant::{Plant, PlantConfig};
use plant_twin::scene::save_obj;

fn print_help() {
    eprintln!("export_plant - Export a posed plant as a Wavefront OBJ snapshot");
    eprintln!();
    eprintln!("Usage: export_plant [OPTIONS] <OUTPUT.obj>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    --seed <SEED>           Seed for plant generation (default: 12345)");
    eprintln!("    -m, --moisture <M>      Moisture level 0-100 (default: recipe initial)");
    eprintln!("    -l, --light <L>         Light level in lux (default: recipe initial)");
    eprintln!("    -c, --config <FILE>     Plant recipe JSON");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    export_plant --seed 42 -m 25 -l 700 ./out/dehydrated.obj");
}

#[derive(Debug)]
struct Args {
    output: PathBuf,
    seed: u64,
    moisture: Option<f32>,
    light: Option<f32>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        return Err("Missing output file".to_string());
    }

    let mut seed: u64 = 12345;
    let mut moisture: Option<f32> = None;
    let mut light: Option<f32> = None;
    let mut config: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;

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
                seed = args[i].parse().map_err(|_| format!("Invalid seed: {}", args[i]))?;
            }
            "-m" | "--moisture" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --moisture".to_string());
                }
                moisture = Some(args[i].parse().map_err(|_| format!("Invalid moisture: {}", args[i]))?);
            }
            "-l" | "--light" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --light".to_string());
                }
                light = Some(args[i].parse().map_err(|_| format!("Invalid light: {}", args[i]))?);
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --config".to_string());
                }
                config = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            path => {
                if output.is_some() {
                    return Err("Multiple output files specified".to_string());
                }
                output = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let output = output.ok_or_else(|| "Missing output file".to_string())?;

    Ok(Args {
        output,
        seed,
        moisture,
        light,
        config,
    })
}

fn run(args: Args) -> plant_twin::core::Result<()> {
    let config = match &args.config {
        Some(path) => PlantConfig::load(path)?,
        None => PlantConfig::default(),
    };
    let moisture = args.moisture.unwrap_or(config.initial_moisture);
    let light = args.light.unwrap_or(config.initial_light);

    let start = Instant::now();
    let mut plant = Plant::with_config(config, RngSource::seeded(args.seed))?;
    plant.update(moisture, light);
    let scene = plant.bake()?;
    log::info!(
        "Generated plant in {:.2?}: {} drawables, {} triangles, leaf color {:?}",
        start.elapsed(),
        scene.objects.len(),
        scene.triangle_count(),
        plant.leaf_color()
    );
    log::info!(
        "Baked buffers: {} vertex bytes, {} index bytes",
        scene.vertex_bytes().len(),
        scene.index_bytes().len()
    );

    if let Some(bounds) = scene.bounds() {
        log::info!(
            "Bounds: min {:?}, max {:?}, center {:?}, size {:?}",
            bounds.min,
            bounds.max,
            bounds.center(),
            bounds.size()
        );
    }

    save_obj(&args.output, &scene)?;
    println!("Wrote {}", args.output.display());
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

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
