//! Winds command handler
//!
//! Cleans a raw wind table: keeps the time, direction and speed columns,
//! drops empty rows and sorts samples by time.

use crate::config::Config;
use crate::error::Result;
use crate::record::{Record, WindSample};
use crate::table::{self, Table};
use clap::Args;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Winds command arguments
#[derive(Args)]
pub struct WindsArgs {
    /// Raw wind table
    #[arg(long)]
    pub from: PathBuf,

    /// Directory to write the cleaned table to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// File name of the cleaned table
    #[arg(long)]
    pub output_file: Option<String>,
}

/// Run the winds command
pub fn run(args: WindsArgs) -> Result<()> {
    let config = Config::load()?;
    let path = execute(args, &config)?;
    println!("{}", path.display());
    Ok(())
}

/// Clean the wind table; returns the path written
pub fn execute(args: WindsArgs, config: &Config) -> Result<PathBuf> {
    let output = args
        .output_dir
        .unwrap_or_else(|| PathBuf::from(&config.winds.output_dir))
        .join(args.output_file.as_deref().unwrap_or(&config.winds.output_file));

    let mut table = clean(&args.from, config)?;
    table.records.sort_by(WindSample::cmp_by_time);
    table.write(&output)?;

    info!("Wrote {} wind samples to {}", table.records.len(), output.display());
    Ok(output)
}

fn clean(path: &Path, config: &Config) -> Result<Table<WindSample>> {
    let file = File::open(path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;

    let rows: Vec<table::RawRow> = table::read_rows(file)?
        .into_iter()
        .map(|(line, mut fields)| {
            fields.truncate(WindSample::COLUMNS);
            (line, fields)
        })
        .filter(|(_, fields)| fields.iter().any(|field| !field.trim().is_empty()))
        .collect();

    Table::from_rows(rows, &path.display().to_string(), &config.date_parser())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RAW_WINDS: &str = "\
Date,Wind Direction,Wind Speed (m/s),,Notes
4/1/16 6:00,210,3.1,,
,,,,
4/1/16 0:00,190,9.1,,gusty
4/1/16 3:00,200,4.5,,
";

    #[test]
    fn test_winds_cleaned_and_sorted() {
        let dir = TempDir::new().unwrap();
        let from = dir.path().join("raw.csv");
        std::fs::write(&from, RAW_WINDS).unwrap();

        let mut config = Config::default();
        config.dates.pivot_year = Some(50);

        let args = WindsArgs {
            from,
            output_dir: Some(dir.path().join("processed")),
            output_file: Some("winds.csv".to_string()),
        };
        let output = execute(args, &config).unwrap();

        assert_eq!(output, dir.path().join("processed").join("winds.csv"));
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            "Date,Wind Direction,Wind Speed (m/s)\n\
             4/1/16 0:00,190,9.1\n\
             4/1/16 3:00,200,4.5\n\
             4/1/16 6:00,210,3.1\n"
        );
    }

    #[test]
    fn test_winds_missing_input() {
        let dir = TempDir::new().unwrap();
        let args = WindsArgs {
            from: dir.path().join("absent.csv"),
            output_dir: Some(dir.path().to_path_buf()),
            output_file: None,
        };
        assert!(execute(args, &Config::default()).is_err());
    }
}
