//! Refine command handler
//!
//! Splits a chemical readings table into one table per chemical and category.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{ChemicalReading, Record};
use crate::refine::{classify_by_chemical, Category, CollisionPolicy, StatsRefiner};
use crate::table::{self, Table};
use clap::Args;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

/// Refine command arguments
#[derive(Args)]
pub struct RefineArgs {
    /// Chemical readings table
    #[arg(long)]
    pub from: PathBuf,

    /// Maximum refinement passes
    #[arg(long, short = 'r')]
    pub runs: Option<usize>,

    /// Standard deviations from the mean before a reading is atypical
    #[arg(long, short = 's')]
    pub stddevs: Option<f64>,

    /// Collision handling: drop_all or keep
    #[arg(long, short = 'c')]
    pub collisions: Option<String>,

    /// Directory to write the category tables to
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

/// Run the refine command
pub fn run(args: RefineArgs) -> Result<()> {
    let config = Config::load()?;
    let written = execute(args, &config)?;
    println!("Wrote {} tables", written.len());
    Ok(())
}

/// Refine with settings from `config` where arguments leave them unset
///
/// Returns the paths written.
pub fn execute(args: RefineArgs, config: &Config) -> Result<Vec<PathBuf>> {
    let refiner = StatsRefiner::new(
        args.stddevs.unwrap_or(config.refine.stddevs),
        args.runs.unwrap_or(config.refine.runs),
    );
    let policy = match args.collisions {
        Some(name) => name.parse::<CollisionPolicy>().map_err(Error::Config)?,
        None => config.collision_policy()?,
    };
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.refine.output_dir));

    let input = Table::<ChemicalReading>::read(&args.from, &config.date_parser())?;
    info!("Loaded {} chemical readings", input.records.len());

    let classified = classify_by_chemical(input.records, policy, &refiner);

    // table names are lowercased, so chemicals differing only by case would share files
    let mut table_names: HashMap<String, &str> = HashMap::new();
    for chemical in classified.keys() {
        if let Some(other) = table_names.insert(chemical.to_lowercase(), chemical) {
            return Err(Error::MalformedRecord(format!(
                "chemicals {:?} and {:?} differ only by case",
                other, chemical
            )));
        }
    }

    let mut written = Vec::new();
    for (chemical, classification) in &classified {
        for category in Category::ALL {
            let path = output_dir.join(table::category_file_name(chemical, category));
            table::write(
                &path,
                input.headers.as_deref(),
                classification.get(category).iter().map(|reading| reading.fields()),
            )?;
            written.push(path);
        }
    }

    info!("Wrote {} tables to {}", written.len(), output_dir.display());
    Ok(written)
}
