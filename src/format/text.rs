//! Human-readable text output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::trace::TraceReport;

const FACTORY_HEADER: &str = "FACTORY";
const EMISSIONS_HEADER: &str = "EMISSIONS #";

/// Text formatter - outputs a summary and an aligned ranking table
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable ranking table"
    }

    fn format(&self, report: &TraceReport) -> Result<String> {
        let mut output = String::new();

        // Header
        output.push_str(&format!("Lookback: {}s\n", report.lookback_seconds));
        output.push_str(&format!("Range: {}\n", report.acceptable_range));
        output.push_str(&format!(
            "Traced: {} of {} readings ({} outside wind periods)\n\n",
            report.traced, report.readings, report.excluded
        ));

        let name_width = report
            .rankings
            .iter()
            .map(|entry| entry.factory.name.chars().count())
            .chain([FACTORY_HEADER.len()])
            .max()
            .unwrap_or_default();

        output.push_str(&format!(
            "{:<width$} | {}\n",
            FACTORY_HEADER,
            EMISSIONS_HEADER,
            width = name_width
        ));
        output.push_str(&format!(
            "{}-|-{}\n",
            "-".repeat(name_width),
            "-".repeat(EMISSIONS_HEADER.len())
        ));

        for entry in &report.rankings {
            output.push_str(&format!(
                "{:<width$} | {}\n",
                entry.factory.name,
                entry.emissions,
                width = name_width
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures::report;

    #[test]
    fn test_text_format() {
        let output = TextFormatter.format(&report()).unwrap();

        assert!(output.contains("Lookback: 3600s"));
        assert!(output.contains("Traced: 7 of 9 readings (2 outside wind periods)"));
        assert!(output.contains("Kasios Office Furniture | 5\n"));
        assert!(output.contains("Radiance ColourTek      | 2\n"));

        let kasios = output.find("Kasios").unwrap();
        let radiance = output.find("Radiance").unwrap();
        assert!(kasios < radiance);
    }

    #[test]
    fn test_text_formatter_info() {
        let formatter = TextFormatter;
        assert_eq!(formatter.name(), "text");
        assert!(!formatter.description().is_empty());
    }
}
