//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod group;
pub mod refine;
pub mod trace;
pub mod winds;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Pollution origin tracer for chemical sensor readings
#[derive(Parser)]
#[command(name = "emission-trace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split chemical readings into normal, atypical and very atypical tables
    Refine(refine::RefineArgs),

    /// Clean and sort a wind table
    Winds(winds::WindsArgs),

    /// Trace readings to their origins and rank factories
    Trace(trace::TraceArgs),

    /// Regroup refined tables by an attribute
    Group(group::GroupArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Refine(args) => refine::run(args),
        Commands::Winds(args) => winds::run(args),
        Commands::Trace(args) => trace::run(args),
        Commands::Group(args) => group::run(args),
        Commands::Config(args) => config::run(args),
    }
}
