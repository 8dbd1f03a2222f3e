//! Configuration management for weighttable
//!
//! Parses TOML configuration files describing the entries to seed a
//! [`WeightTable`] with, plus sampling and logging settings.

use crate::error::{AppError, AppResult};
use crate::table::WeightTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Upper bound on draws per `draw` command run
pub const MAX_DRAWS: u64 = 100_000_000;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Settings for the `draw` command
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SamplingConfig {
    /// Number of draws to perform when none is given on the command line
    #[serde(default = "default_draws")]
    pub draws: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            draws: default_draws(),
        }
    }
}

fn default_draws() -> u64 {
    100_000
}

/// A single weighted entry
///
/// Fields are private; entries are built by deserialization and checked by
/// [`Config::validate`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntryConfig {
    key: String,
    value: String,
    weight: i64,
}

impl EntryConfig {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn weight(&self) -> i64 {
        self.weight
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        let config: Self =
            toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            })?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; call it explicitly when a
    /// `Config` is built some other way.
    pub fn validate(&self) -> AppResult<()> {
        if !LOG_LEVELS.contains(&self.observability.log_level.as_str()) {
            return Err(AppError::Config(format!(
                "observability.log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.observability.log_level
            )));
        }

        if self.sampling.draws == 0 || self.sampling.draws > MAX_DRAWS {
            return Err(AppError::Config(format!(
                "sampling.draws must be between 1 and {}, got {}",
                MAX_DRAWS, self.sampling.draws
            )));
        }

        if self.entries.is_empty() {
            return Err(AppError::Config(
                "at least one [[entries]] table is required".to_string(),
            ));
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.key.is_empty() {
                return Err(AppError::Config(format!(
                    "entries[{}] has an empty key",
                    index
                )));
            }
            if entry.weight <= 0 {
                return Err(AppError::Config(format!(
                    "entry '{}' has invalid weight {}. Weight must be a positive integer.",
                    entry.key, entry.weight
                )));
            }
        }

        Ok(())
    }

    /// Build a table holding every configured entry
    ///
    /// Repeated keys accumulate weight and the later value wins, exactly
    /// as repeated adds would.
    pub fn build_table(&self) -> AppResult<WeightTable<String>> {
        let table = WeightTable::new();
        for entry in &self.entries {
            table
                .try_add(&entry.key, Some(entry.value.clone()), entry.weight)
                .map_err(|source| AppError::InvalidEntry {
                    key: entry.key.clone(),
                    source,
                })?;
        }

        tracing::info!(
            entries = table.len(),
            total_weight = table.total_weight(),
            "Seeded weight table from configuration"
        );
        Ok(table)
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
