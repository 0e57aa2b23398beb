//! Trace command handler
//!
//! Traces chemical readings back to their emission origins and ranks
//! factories by the origins within range of them.

use crate::config::Config;
use crate::constants::output::ORIGIN_HEADERS;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter};
use crate::record::{ChemicalReading, Factory, Monitor, WindSample};
use crate::table::{self, Table};
use crate::trace::{self, TraceParams};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Trace command arguments
#[derive(Args)]
pub struct TraceArgs {
    /// Chemical readings table (usually a refined category table)
    #[arg(long, required_unless_present = "list_formats")]
    pub chem: Option<PathBuf>,

    /// Seconds to project each reading backward
    #[arg(long, short = 'l', allow_negative_numbers = true)]
    pub lookback_secs: Option<i64>,

    /// Distance within which an origin is attributed to a factory
    #[arg(long, short = 'r')]
    pub range: Option<f64>,

    /// Wind table
    #[arg(long)]
    pub winds: Option<PathBuf>,

    /// Factory table
    #[arg(long)]
    pub factories: Option<PathBuf>,

    /// Monitor table
    #[arg(long)]
    pub monitors: Option<PathBuf>,

    /// Write the traced origins to this table
    #[arg(long)]
    pub store_origins: Option<PathBuf>,

    /// Interpolate wind at chemical reading timestamps
    #[arg(long)]
    pub interpolate: bool,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the trace command
pub fn run(args: TraceArgs) -> Result<()> {
    if args.list_formats {
        print_formats();
        return Ok(());
    }

    let config = Config::load()?;
    let output_path = args.output.clone();
    let output = execute(args, &config)?;

    match output_path {
        Some(path) => {
            std::fs::write(&path, &output)?;
            println!("Output written to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Trace with settings from `config` where arguments leave them unset
///
/// Returns the formatted report.
pub fn execute(args: TraceArgs, config: &Config) -> Result<String> {
    let chem = args
        .chem
        .ok_or_else(|| missing_parameter("--chem"))?;
    let lookback_seconds = args
        .lookback_secs
        .or(config.trace.lookback_secs)
        .ok_or_else(|| missing_parameter("--lookback-secs"))?;
    let acceptable_range = args
        .range
        .or(config.trace.range)
        .ok_or_else(|| missing_parameter("--range"))?;

    let format = args.format.unwrap_or_else(|| config.trace.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("Unknown format: {}", format)))?;

    let dates = config.date_parser();
    let winds = args.winds.unwrap_or_else(|| PathBuf::from(&config.trace.winds));
    let factories = args
        .factories
        .unwrap_or_else(|| PathBuf::from(&config.trace.factories));
    let monitors = args
        .monitors
        .unwrap_or_else(|| PathBuf::from(&config.trace.monitors));

    let readings = Table::<ChemicalReading>::read(&chem, &dates)?.records;
    let samples = Table::<WindSample>::read(&winds, &dates)?.records;
    let factories = Table::<Factory>::read(&factories, &dates)?.records;
    let monitors = Table::<Monitor>::read(&monitors, &dates)?.records;
    info!(
        "Loaded {} readings, {} wind samples, {} factories, {} monitors",
        readings.len(),
        samples.len(),
        factories.len(),
        monitors.len()
    );

    let params = TraceParams {
        lookback_seconds,
        acceptable_range,
        interpolate: args.interpolate || config.trace.interpolate,
    };
    let run = trace::run(&readings, samples, &monitors, &factories, &params)?;

    if let Some(path) = args.store_origins {
        let headers: Vec<String> = ORIGIN_HEADERS.iter().map(|h| h.to_string()).collect();
        table::write(&path, Some(headers.as_slice()), run.origins.iter().map(|origin| origin.fields()))?;
        info!("Stored {} origins in {}", run.origins.len(), path.display());
    }

    formatter.format(&run.report)
}

fn missing_parameter(name: &str) -> Error {
    Error::Config(format!("Missing required parameter '{}'", name))
}

/// Print available output formats
fn print_formats() {
    println!("Available output formats:");
    for info in available_formats() {
        println!("  {:<8} {}", info.name, info.description);
    }
}
