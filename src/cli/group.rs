//! Group command handler
//!
//! Merges refined category tables and regroups their readings by an
//! attribute, one table per attribute value.

use crate::config::Config;
use crate::constants::output::TABLE_EXTENSION;
use crate::error::{Error, Result};
use crate::record::grouping::{group_by, GroupAttribute};
use crate::record::{ChemicalReading, Record};
use crate::refine::Category;
use crate::table::{self, Table};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Group command arguments
#[derive(Args)]
pub struct GroupArgs {
    /// Directory holding the refined category tables
    #[arg(long)]
    pub from: Option<PathBuf>,

    /// Attribute to group by: chemical, monitor, year, month or weekday
    #[arg(long, short = 'b')]
    pub by: String,

    /// Categories to include, comma separated
    #[arg(long = "type", short = 't', value_delimiter = ',', default_value = "very_atypical")]
    pub types: Vec<String>,

    /// Root directory for the grouped tables
    #[arg(long, short = 'o')]
    pub output_dir: Option<PathBuf>,
}

/// Run the group command
pub fn run(args: GroupArgs) -> Result<()> {
    let config = Config::load()?;
    let written = execute(args, &config)?;
    println!("Wrote {} tables", written.len());
    Ok(())
}

/// Regroup with settings from `config` where arguments leave them unset
///
/// Returns the paths written.
pub fn execute(args: GroupArgs, config: &Config) -> Result<Vec<PathBuf>> {
    let attribute: GroupAttribute = args.by.parse().map_err(Error::Config)?;

    let mut categories = args
        .types
        .iter()
        .map(|name| name.parse::<Category>().map_err(Error::Config))
        .collect::<Result<Vec<_>>>()?;
    categories.sort_by_key(|category| category.to_string());
    categories.dedup();

    let from = args
        .from
        .unwrap_or_else(|| PathBuf::from(&config.refine.output_dir));
    let root = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.group.output_dir));

    let dates = config.date_parser();
    let mut headers = None;
    let mut readings = Vec::new();
    for path in category_tables(&from, &categories)? {
        let table = Table::<ChemicalReading>::read(&path, &dates)?;
        headers = headers.or(table.headers);
        readings.extend(table.records);
    }
    info!("Loaded {} readings from {}", readings.len(), from.display());

    let category_names: Vec<String> = categories.iter().map(ToString::to_string).collect();
    let output_dir = root
        .join("groupings")
        .join(attribute.to_string())
        .join(category_names.join("-"));

    let mut written = Vec::new();
    for (value, group) in group_by(readings, attribute) {
        let path = output_dir.join(format!("{}-{}.{}", attribute, value, TABLE_EXTENSION));
        table::write(
            &path,
            headers.as_deref(),
            group.iter().map(|reading| reading.fields()),
        )?;
        written.push(path);
    }

    info!("Wrote {} groups to {}", written.len(), output_dir.display());
    Ok(written)
}

/// Category tables in `dir`, sorted by file name
fn category_tables(dir: &Path, categories: &[Category]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if categories
            .iter()
            .any(|category| table::is_category_file(name, category))
        {
            debug!("Including {}", path.display());
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
