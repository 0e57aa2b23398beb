//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default number of standard deviations before a reading is atypical
pub const DEFAULT_STDDEVS: f64 = 1.0;

/// Default maximum number of refinement passes
pub const DEFAULT_RUNS: usize = 2;

/// Default handling of colliding readings
pub const DEFAULT_COLLISIONS: &str = "drop_all";

/// Default directory for refined chemical tables
pub const DEFAULT_REFINE_OUTPUT_DIR: &str = "data/processed/chems";

/// Default cleaned wind table
pub const DEFAULT_WINDS_PATH: &str = "data/processed/winds.csv";

/// Default factory table
pub const DEFAULT_FACTORIES_PATH: &str = "data/processed/factories.csv";

/// Default monitor table
pub const DEFAULT_MONITORS_PATH: &str = "data/processed/monitors.csv";

/// Default report format
pub const DEFAULT_FORMAT: &str = "text";

/// Default directory for the cleaned wind table
pub const DEFAULT_WINDS_OUTPUT_DIR: &str = "data/processed";

/// Default name of the cleaned wind table
pub const DEFAULT_WINDS_OUTPUT_FILE: &str = "winds.csv";

/// Default root directory for regrouped tables
pub const DEFAULT_GROUP_OUTPUT_DIR: &str = "data/processed";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "emission-trace";
