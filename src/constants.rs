//! Centralized constants for the emission-trace crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Date handling constants
pub mod dates {
    /// Century that two-digit years belong to unless they roll over
    pub const DEFAULT_BASE_YEAR: i32 = 2000;

    /// Abbreviated month names, January first
    pub const MONTH_NAMES: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    /// Abbreviated weekday names, Sunday first
    pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
}

/// Table output constants
pub mod output {
    /// Header row of the emission origin table
    pub const ORIGIN_HEADERS: [&str; 3] = ["X", "Y", "DateTime"];

    /// Extension used for every table written
    pub const TABLE_EXTENSION: &str = "csv";
}
