use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cpmm_simulation::{Scenario, ScenarioRunner};

#[derive(Parser, Debug)]
#[command(name = "cpmm-sim")]
#[command(about = "Replay constant-product AMM scenarios off-chain")]
struct Args {
    /// Path to the scenario file
    #[arg(short, long, default_value = "scenarios/basic.toml")]
    scenario: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!(path = %args.scenario.display(), "loading scenario");
    let scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("loading {}", args.scenario.display()))?;

    let mut runner = ScenarioRunner::new(scenario)?;
    let report = runner.run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
