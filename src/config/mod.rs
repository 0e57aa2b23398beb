//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/emission-trace/config.toml

pub mod defaults;

use crate::constants::dates::DEFAULT_BASE_YEAR;
use crate::error::{Error, Result};
use crate::record::dates::DateParser;
use crate::refine::{CollisionPolicy, StatsRefiner};
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Statistical refinement settings
    #[serde(default)]
    pub refine: RefineConfig,

    /// Emission tracing settings
    #[serde(default)]
    pub trace: TraceConfig,

    /// Wind table cleaning settings
    #[serde(default)]
    pub winds: WindsConfig,

    /// Regrouping settings
    #[serde(default)]
    pub group: GroupConfig,

    /// Date parsing settings
    #[serde(default)]
    pub dates: DatesConfig,
}

/// Statistical refinement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineConfig {
    /// Standard deviations from the mean before a reading is atypical
    #[serde(default = "default_stddevs")]
    pub stddevs: f64,

    /// Maximum refinement passes
    #[serde(default = "default_runs")]
    pub runs: usize,

    /// Collision handling: drop_all or keep
    #[serde(default = "default_collisions")]
    pub collisions: String,

    /// Directory the category tables are written to
    #[serde(default = "default_refine_output_dir")]
    pub output_dir: String,
}

/// Emission tracing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Wind table
    #[serde(default = "default_winds_path")]
    pub winds: String,

    /// Factory table
    #[serde(default = "default_factories_path")]
    pub factories: String,

    /// Monitor table
    #[serde(default = "default_monitors_path")]
    pub monitors: String,

    /// Seconds to project each reading backward
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lookback_secs: Option<i64>,

    /// Distance within which an origin is attributed to a factory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,

    /// Interpolate wind at chemical reading timestamps
    #[serde(default)]
    pub interpolate: bool,

    /// Report format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Wind table cleaning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindsConfig {
    #[serde(default = "default_winds_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_winds_output_file")]
    pub output_file: String,
}

/// Regrouping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Root directory; groups go under `<output_dir>/groupings/<attribute>/<categories>`
    #[serde(default = "default_group_output_dir")]
    pub output_dir: String,
}

/// Date parsing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatesConfig {
    /// Century two-digit years are added to
    #[serde(default = "default_base_year")]
    pub base_year: i32,

    /// Two-digit years above this belong to the previous century
    /// (current two-digit year when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_year: Option<u32>,
}

// Default value functions for serde
fn default_stddevs() -> f64 {
    DEFAULT_STDDEVS
}
fn default_runs() -> usize {
    DEFAULT_RUNS
}
fn default_collisions() -> String {
    DEFAULT_COLLISIONS.to_string()
}
fn default_refine_output_dir() -> String {
    DEFAULT_REFINE_OUTPUT_DIR.to_string()
}
fn default_winds_path() -> String {
    DEFAULT_WINDS_PATH.to_string()
}
fn default_factories_path() -> String {
    DEFAULT_FACTORIES_PATH.to_string()
}
fn default_monitors_path() -> String {
    DEFAULT_MONITORS_PATH.to_string()
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_winds_output_dir() -> String {
    DEFAULT_WINDS_OUTPUT_DIR.to_string()
}
fn default_winds_output_file() -> String {
    DEFAULT_WINDS_OUTPUT_FILE.to_string()
}
fn default_group_output_dir() -> String {
    DEFAULT_GROUP_OUTPUT_DIR.to_string()
}
fn default_base_year() -> i32 {
    DEFAULT_BASE_YEAR
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            stddevs: default_stddevs(),
            runs: default_runs(),
            collisions: default_collisions(),
            output_dir: default_refine_output_dir(),
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            winds: default_winds_path(),
            factories: default_factories_path(),
            monitors: default_monitors_path(),
            lookback_secs: None,
            range: None,
            interpolate: false,
            format: default_format(),
        }
    }
}

impl Default for WindsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_winds_output_dir(),
            output_file: default_winds_output_file(),
        }
    }
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            output_dir: default_group_output_dir(),
        }
    }
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            base_year: default_base_year(),
            pivot_year: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, creating a default file if missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key". Unset optional values read as "".
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["refine", "stddevs"] => Some(self.refine.stddevs.to_string()),
            ["refine", "runs"] => Some(self.refine.runs.to_string()),
            ["refine", "collisions"] => Some(self.refine.collisions.clone()),
            ["refine", "output_dir"] => Some(self.refine.output_dir.clone()),

            ["trace", "winds"] => Some(self.trace.winds.clone()),
            ["trace", "factories"] => Some(self.trace.factories.clone()),
            ["trace", "monitors"] => Some(self.trace.monitors.clone()),
            ["trace", "lookback_secs"] => Some(optional(self.trace.lookback_secs)),
            ["trace", "range"] => Some(optional(self.trace.range)),
            ["trace", "interpolate"] => Some(self.trace.interpolate.to_string()),
            ["trace", "format"] => Some(self.trace.format.clone()),

            ["winds", "output_dir"] => Some(self.winds.output_dir.clone()),
            ["winds", "output_file"] => Some(self.winds.output_file.clone()),

            ["group", "output_dir"] => Some(self.group.output_dir.clone()),

            ["dates", "base_year"] => Some(self.dates.base_year.to_string()),
            ["dates", "pivot_year"] => Some(optional(self.dates.pivot_year)),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key". An empty value clears an optional key.
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["refine", "stddevs"] => {
                self.refine.stddevs = parse_value(key, value)?;
            }
            ["refine", "runs"] => {
                self.refine.runs = parse_value(key, value)?;
            }
            ["refine", "collisions"] => {
                let policy: CollisionPolicy = value.parse().map_err(Error::Config)?;
                self.refine.collisions = policy.to_string();
            }
            ["refine", "output_dir"] => {
                self.refine.output_dir = value.to_string();
            }

            ["trace", "winds"] => {
                self.trace.winds = value.to_string();
            }
            ["trace", "factories"] => {
                self.trace.factories = value.to_string();
            }
            ["trace", "monitors"] => {
                self.trace.monitors = value.to_string();
            }
            ["trace", "lookback_secs"] => {
                self.trace.lookback_secs = parse_optional(key, value)?;
            }
            ["trace", "range"] => {
                self.trace.range = parse_optional(key, value)?;
            }
            ["trace", "interpolate"] => {
                self.trace.interpolate = parse_value(key, value)?;
            }
            ["trace", "format"] => {
                self.trace.format = value.to_string();
            }

            ["winds", "output_dir"] => {
                self.winds.output_dir = value.to_string();
            }
            ["winds", "output_file"] => {
                self.winds.output_file = value.to_string();
            }

            ["group", "output_dir"] => {
                self.group.output_dir = value.to_string();
            }

            ["dates", "base_year"] => {
                self.dates.base_year = parse_value(key, value)?;
            }
            ["dates", "pivot_year"] => {
                let pivot: Option<u32> = parse_optional(key, value)?;
                if pivot.is_some_and(|year| year > 99) {
                    return Err(Error::Config(format!(
                        "Invalid dates.pivot_year value: {} (expected 0-99)",
                        value
                    )));
                }
                self.dates.pivot_year = pivot;
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "refine.stddevs",
            "refine.runs",
            "refine.collisions",
            "refine.output_dir",
            "trace.winds",
            "trace.factories",
            "trace.monitors",
            "trace.lookback_secs",
            "trace.range",
            "trace.interpolate",
            "trace.format",
            "winds.output_dir",
            "winds.output_file",
            "group.output_dir",
            "dates.base_year",
            "dates.pivot_year",
        ]
    }

    /// Date parser following the `[dates]` settings
    pub fn date_parser(&self) -> DateParser {
        match self.dates.pivot_year {
            Some(pivot) => DateParser::new(self.dates.base_year, pivot),
            None => DateParser::with_current_pivot(self.dates.base_year),
        }
    }

    /// Refiner following the `[refine]` settings
    pub fn refiner(&self) -> StatsRefiner {
        StatsRefiner::new(self.refine.stddevs, self.refine.runs)
    }

    /// Collision policy following the `[refine]` settings
    pub fn collision_policy(&self) -> Result<CollisionPolicy> {
        self.refine.collisions.parse().map_err(Error::Config)
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("Invalid {} value: {}", key, value)))
}

fn parse_optional<T: std::str::FromStr>(key: &str, value: &str) -> Result<Option<T>> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_value(key, value).map(Some)
    }
}
