//! Tabular input and output
//!
//! Reads comma-separated tables into records and writes records back out.
//! A table's first row is its header when none of its typed columns parse;
//! headers are carried through to outputs unchanged.

use crate::constants::output::TABLE_EXTENSION;
use crate::error::Result;
use crate::record::dates::DateParser;
use crate::record::Record;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::debug;

/// A raw table row and the line it was read from
pub type RawRow = (u64, Vec<String>);

/// Records read from a table, with the header row if it had one
#[derive(Debug, Clone)]
pub struct Table<R> {
    pub headers: Option<Vec<String>>,
    pub records: Vec<R>,
}

impl<R: Record> Table<R> {
    /// Read a table file
    pub fn read(path: &Path, dates: &DateParser) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            io::Error::new(e.kind(), format!("{}: {}", path.display(), e))
        })?;
        let table = Self::from_rows(read_rows(file)?, &path.display().to_string(), dates)?;

        debug!("Read {} {} rows from {}", table.records.len(), R::KIND, path.display());
        Ok(table)
    }

    /// Build records from raw rows; `source` names the rows in error messages
    pub fn from_rows(rows: Vec<RawRow>, source: &str, dates: &DateParser) -> Result<Self> {
        let mut rows = rows.into_iter().peekable();

        let first_is_header = rows
            .peek()
            .is_some_and(|(_, fields)| R::is_header(&as_strs(fields), dates));
        let headers = if first_is_header {
            rows.next().map(|(_, fields)| fields)
        } else {
            None
        };

        let records = rows
            .map(|(line, fields)| {
                R::from_fields(&as_strs(&fields), dates).map_err(|e| e.at_line(source, line))
            })
            .collect::<Result<Vec<R>>>()?;

        Ok(Self { headers, records })
    }

    /// Write the table, header first if present
    pub fn write(&self, path: &Path) -> Result<()> {
        write(
            path,
            self.headers.as_deref(),
            self.records.iter().map(|record| record.fields()),
        )
    }
}

/// Read every non-empty row of a comma-separated table
pub fn read_rows<Rd: io::Read>(reader: Rd) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());
        rows.push((line, record.iter().map(str::to_string).collect()));
    }

    Ok(rows)
}

/// Write rows to a table file, creating parent directories as needed
pub fn write<I, F>(path: &Path, headers: Option<&[String]>, rows: I) -> Result<()>
where
    I: IntoIterator<Item = F>,
    F: IntoIterator,
    F::Item: AsRef<[u8]>,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;

    if let Some(headers) = headers {
        writer.write_record(headers)?;
    }
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    debug!("Wrote {}", path.display());
    Ok(())
}

/// File name of one chemical's category table, e.g. `agoc-3a-very_atypical.csv`
pub fn category_file_name(chemical: &str, category: impl std::fmt::Display) -> String {
    format!("{}-{}.{}", chemical.to_lowercase(), category, TABLE_EXTENSION)
}

/// Whether a file name belongs to a table of the given category
pub fn is_category_file(file_name: &str, category: impl std::fmt::Display) -> bool {
    file_name.ends_with(&format!("-{}.{}", category, TABLE_EXTENSION))
}

fn as_strs(fields: &[String]) -> Vec<&str> {
    fields.iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::record::{ChemicalReading, Monitor};
    use tempfile::TempDir;

    const READINGS: &str = "\
Chemical,Monitor,DateTime,Reading
Methylosmolene,3,4/1/16 0:00,0.5
AGOC-3A,1,4/1/16 1:00,1.75
";

    fn parser() -> DateParser {
        DateParser::new(2000, 24)
    }

    #[test]
    fn test_header_is_detected() {
        let rows = read_rows(READINGS.as_bytes()).unwrap();
        let table = Table::<ChemicalReading>::from_rows(rows, "readings.csv", &parser()).unwrap();

        assert_eq!(
            table.headers,
            Some(vec![
                "Chemical".to_string(),
                "Monitor".to_string(),
                "DateTime".to_string(),
                "Reading".to_string()
            ])
        );
        assert_eq!(table.records.len(), 2);
        assert_eq!(table.records[1].chemical, "AGOC-3A");
    }

    #[test]
    fn test_headerless_table() {
        let rows = read_rows("1,62,21\n2,66,35\n".as_bytes()).unwrap();
        let table = Table::<Monitor>::from_rows(rows, "monitors.csv", &parser()).unwrap();

        assert!(table.headers.is_none());
        assert_eq!(table.records.len(), 2);
    }

    #[test]
    fn test_malformed_row_reports_line() {
        let rows = read_rows(format!("{}AGOC-3A,x,4/1/16 1:00,1.0\n", READINGS).as_bytes()).unwrap();
        let error = Table::<ChemicalReading>::from_rows(rows, "readings.csv", &parser()).unwrap_err();

        match error {
            Error::MalformedRecord(message) => {
                assert!(message.starts_with("readings.csv:4:"), "{}", message)
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_first_row_is_not_a_header() {
        let rows = read_rows("AGOC-3A,1,4/1/16 0:00,abc\nAGOC-3A,1,4/1/16 1:00,2.0\n".as_bytes()).unwrap();
        let error = Table::<ChemicalReading>::from_rows(rows, "readings.csv", &parser()).unwrap_err();

        match error {
            Error::MalformedRecord(message) => {
                assert!(message.starts_with("readings.csv:1:"), "{}", message)
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_write_then_read_preserves_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("readings.csv");

        let rows = read_rows(READINGS.as_bytes()).unwrap();
        let table = Table::<ChemicalReading>::from_rows(rows, "readings.csv", &parser()).unwrap();
        table.write(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), READINGS);
    }

    #[test]
    fn test_read_missing_file() {
        let result = Table::<Monitor>::read(Path::new("/definitely/not/here.csv"), &parser());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_category_file_names() {
        assert_eq!(category_file_name("AGOC-3A", "very_atypical"), "agoc-3a-very_atypical.csv");
        assert!(is_category_file("agoc-3a-atypical.csv", "atypical"));
        assert!(!is_category_file("agoc-3a-very_atypical.csv", "atypical"));
        assert!(is_category_file("agoc-3a-very_atypical.csv", "very_atypical"));
    }
}
