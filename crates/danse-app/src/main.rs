//! `danse`: plays a scripted session and prints the final snapshot.
//!
//! Usage:
//!   danse --ticks 600 --verbose
//!   danse --config session.json --realtime

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use danse_app::cli::Args;
use danse_app::{logging, script};
use danse_core::config::SimConfig;
use danse_sim::SimulationEngine;

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::default(),
    };
    let ticks = script::timeline(&script::demo_script(), args.ticks);
    info!("running {} ticks (seed {})", ticks.len(), config.seed);

    let snapshot = if args.realtime {
        script::run_realtime(config, &ticks)?
    } else {
        let mut engine = SimulationEngine::try_new(config)?;
        script::run_headless(&mut engine, &ticks)
    };

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
