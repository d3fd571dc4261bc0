//! RPS Arena headless runner
//!
//! Runs the simulation without a renderer and reports how the population
//! evolved. Set `RUST_LOG=debug` to see individual contacts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rps_arena::sim::{SimState, tick};
use rps_arena::{Shape, SimConfig};

#[derive(Debug, Parser)]
#[command(name = "rps-arena", about = "Rock-paper-scissors particle arena")]
struct Cli {
    /// JSON config file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the agent count
    #[arg(long)]
    agents: Option<u32>,

    /// Stop early once every agent holds the same shape
    #[arg(long)]
    until_settled: bool,

    /// Print the population history as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn build_config(cli: &Cli) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(agents) = cli.agents {
        config.agent_count = agents;
    }
    config.validate()?;
    Ok(config)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(&cli)?;
    let mut state = SimState::new(config)?;
    state.resume()?;

    let mut conversions = 0usize;
    for _ in 0..cli.ticks {
        let report = tick(&mut state);
        conversions += report.conversions.len();
        if report.sampled {
            let pop = state.population();
            log::debug!(
                "tick {:>6}: rock={} paper={} scissors={}",
                state.time_ticks(),
                pop.rock,
                pop.paper,
                pop.scissors
            );
            if cli.until_settled && pop.winner().is_some() {
                break;
            }
        }
    }
    state.pause();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(state.history())?);
        return Ok(());
    }

    let pop = state.population();
    println!("Ticks run:    {}", state.time_ticks());
    println!("Conversions:  {}", conversions);
    for shape in Shape::ALL {
        println!("{:<12}  {}", shape.as_str(), pop.get(shape));
    }
    if let Some(winner) = pop.winner() {
        println!("{} took over the arena", winner);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("RPS Arena (headless) starting...");

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
