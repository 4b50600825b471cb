//! Command-line arguments for the `danse` binary.

use std::path::PathBuf;

use clap::Parser;

/// Play a scripted leader/follower session and print the final snapshot
#[derive(Debug, Parser)]
#[command(name = "danse", author, version, about, long_about = None)]
pub struct Args {
    /// JSON session config; missing fields take their defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Total ticks to run; the script is truncated or padded with idle input
    #[arg(long, value_name = "N")]
    pub ticks: Option<usize>,

    /// Run through the game loop thread at wall-clock pace
    #[arg(long)]
    pub realtime: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
