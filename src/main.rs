use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use farmstead::cli::commands;
use farmstead::config::simulation::SimulationConfig;

#[derive(Parser)]
#[command(name = "farmstead")]
#[command(about = "A tile-based farming simulation with crops, trading, and a day cycle")]
#[command(version)]
struct Cli {
    /// Path to the simulation configuration file (built-in defaults if omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to an item catalog, overriding `catalog_file` in the config
    #[arg(long, global = true)]
    catalog: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new farm map from procedural parameters
    Generate {
        /// Path to a map generation parameters file
        #[arg(short, long)]
        params: Option<String>,

        /// Seed override (0 picks a random seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output map file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the starting state of a farm
    Inspect {
        /// Path to the map file
        #[arg(short, long)]
        map: String,

        /// Print the full state snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Play a sequence of actions against a farm
    Run {
        /// Path to the map file
        #[arg(short, long)]
        map: String,

        /// File with one action per line (stdin if omitted)
        #[arg(short, long)]
        script: Option<String>,
    },
}

fn init_tracing(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => match SimulationConfig::from_file(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };
    init_tracing(&config);

    let result = match cli.command {
        Commands::Generate {
            params,
            seed,
            output,
        } => commands::generate(params.as_deref(), seed, output.as_deref()),

        Commands::Inspect { map, json } => {
            commands::load_catalog(&config, cli.catalog.as_deref())
                .and_then(|catalog| commands::inspect(&config, catalog, &map, json))
        }

        Commands::Run { map, script } => {
            commands::load_catalog(&config, cli.catalog.as_deref())
                .and_then(|catalog| commands::run(&config, catalog, &map, script.as_deref()))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
