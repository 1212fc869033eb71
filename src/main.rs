//! Pod Sim - Entry Point
//!
//! Rolls mission encounters from a strategy AI configuration file, aggregates
//! many runs into spawn statistics, or rewrites a configuration file in normal form.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pod_sim::core::error::{PodSimError, Result};
use pod_sim::core::types::{ship_size_of, MissionKind};
use pod_sim::ini::{generate_config, load_config_file, write_config_file};
use pod_sim::simulation::{run_distribution, PodSimulator};
use pod_sim::tables::GameCore;
use pod_sim::SimConfig;

/// Strategy AI encounter simulator
#[derive(Parser, Debug)]
#[command(name = "pod-sim")]
#[command(about = "Simulate the alien pods a mission would spawn from strategy AI config tables")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Roll a single mission encounter
    Roll {
        #[command(flatten)]
        mission: MissionArgs,
    },

    /// Roll many encounters and report spawn frequencies
    Distribution {
        #[command(flatten)]
        mission: MissionArgs,

        /// Number of simulated missions
        #[arg(long, default_value_t = 1000)]
        runs: u64,
    },

    /// Parse a configuration file and write it back in normal form
    Normalize {
        /// Configuration file to read
        #[arg(long)]
        config: PathBuf,

        /// Destination file (stdout if omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct MissionArgs {
    /// Strategy AI configuration file
    #[arg(long)]
    config: PathBuf,

    /// Game core file with unit base stats and balance upgrades
    #[arg(long)]
    game_core: Option<PathBuf>,

    /// TOML scenario file; command-line flags override its values
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Mission kind (Abduction, Terror, UFO, BigUFO, ...)
    #[arg(long)]
    mission: Option<MissionKind>,

    /// Campaign month
    #[arg(long)]
    month: Option<u32>,

    /// Alien resources
    #[arg(long)]
    resources: Option<u32>,

    /// Mission difficulty
    #[arg(long)]
    difficulty: Option<i64>,

    /// Ship size for UFO missions
    #[arg(long)]
    ship_size: Option<i64>,

    /// Ship type for UFO missions, such as eShip_UFOAbductor; `--ship-size` wins over it
    #[arg(long)]
    ship_type: Option<String>,

    /// The UFO crashed instead of landing
    #[arg(long)]
    crashed: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl MissionArgs {
    fn scenario(&self) -> Result<SimConfig> {
        let mut sim = match &self.scenario {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };

        if let Some(mission) = self.mission {
            sim.mission = mission;
        }
        if let Some(month) = self.month {
            sim.month = month;
        }
        if let Some(resources) = self.resources {
            sim.resources = resources;
        }
        if let Some(difficulty) = self.difficulty {
            sim.difficulty = difficulty;
        }
        if self.ship_size.is_some() {
            sim.ship_size = self.ship_size;
        }
        if let Some(ship_type) = &self.ship_type {
            if ship_size_of(ship_type).is_none() {
                return Err(PodSimError::InvalidArgument(format!(
                    "unknown ship type {}",
                    ship_type
                )));
            }
            sim.ship_type = Some(ship_type.clone());
        }
        if self.crashed {
            sim.landed = false;
        }
        Ok(sim)
    }

    fn game_core(&self) -> Result<GameCore> {
        match &self.game_core {
            Some(path) => GameCore::load(path),
            None => Ok(GameCore::default()),
        }
    }

    fn json(&self) -> Result<bool> {
        match self.format.as_str() {
            "json" => Ok(true),
            "text" => Ok(false),
            other => Err(PodSimError::InvalidArgument(format!(
                "unknown format '{}', expected text or json",
                other
            ))),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pod_sim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Commands::Roll { mission } => roll(&mission),
        Commands::Distribution { mission, runs } => distribution(&mission, runs),
        Commands::Normalize { config, output } => {
            let document = load_config_file(&config)?;
            match output {
                Some(path) => {
                    write_config_file(&path, &document)?;
                    tracing::info!("Wrote {} sections to {}", document.len(), path.display());
                }
                None => print!("{}", generate_config(&document)),
            }
            Ok(())
        }
    }
}

fn roll(args: &MissionArgs) -> Result<()> {
    let json = args.json()?;
    let sim = args.scenario()?;
    let document = load_config_file(&args.config)?;
    let core = args.game_core()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::info!("Rolling {} month {} with seed {}", sim.mission, sim.month, seed);

    let simulator = PodSimulator::new(&document, &core.base_stats, &core.upgrades)
        .with_perks(core.perks.clone());
    let result = simulator.run(&sim, &mut rng);

    let report = if json { result.to_json() } else { result.summary() };
    emit(&report, args.output.as_deref())
}

fn distribution(args: &MissionArgs, runs: u64) -> Result<()> {
    let json = args.json()?;
    let sim = args.scenario()?;
    let document = load_config_file(&args.config)?;
    let core = args.game_core()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let simulator = PodSimulator::new(&document, &core.base_stats, &core.upgrades)
        .with_perks(core.perks.clone());
    let report = run_distribution(&simulator, &sim, runs, seed);

    let text = if json { report.to_json() } else { report.summary() };
    emit(&text, args.output.as_deref())
}

fn emit(report: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, format!("{}\n", report))?,
        None => println!("{}", report),
    }
    Ok(())
}
