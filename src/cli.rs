//! Command-line interface for weighttable
//!
//! Argument parsing, subcommand handling, and the JSON reports the binary
//! prints.

use crate::table::WeightTable;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Inspect and sample a weighted random selection table
#[derive(Parser)]
#[command(name = "weighttable")]
#[command(version)]
#[command(about = "Inspect and sample a weighted random selection table")]
#[command(
    long_about = "Loads weighted entries from a TOML configuration file and reports \
    their selection probabilities or samples them with weighted random draws."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "weighttable.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the percentage chance of drawing each entry
    Probabilities {
        /// Only report this key
        #[arg(short, long)]
        key: Option<String>,
    },
    /// Draw repeatedly and compare observed frequencies to expected ones
    Draw {
        /// Number of draws (defaults to sampling.draws from the config)
        #[arg(short = 'n', long)]
        count: Option<u64>,
    },
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Observed vs. expected share of draws for one key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawStat {
    pub hits: u64,
    pub observed_percent: f64,
    pub expected_percent: f64,
}

/// Result of a `draw` run, keyed by entry
#[derive(Debug, Clone, Serialize)]
pub struct DrawReport {
    pub draws: u64,
    pub entries: BTreeMap<String, DrawStat>,
}

/// Draw `count` times from `table` and tally the results
pub fn sample<V: Clone>(table: &WeightTable<V>, count: u64) -> DrawReport {
    let mut hits: HashMap<String, u64> = HashMap::new();
    let mut rng = rand::rng();
    for _ in 0..count {
        if let Some((key, _)) = table.get_with(&mut rng) {
            *hits.entry(key).or_insert(0) += 1;
        }
    }

    let entries = table
        .get_all_probabilities()
        .into_iter()
        .map(|(key, expected_percent)| {
            let key_hits = hits.get(&key).copied().unwrap_or(0);
            let observed_percent = if count == 0 {
                0.0
            } else {
                (key_hits as f64 / count as f64 * 100.0 * 100.0).round() / 100.0
            };
            (
                key,
                DrawStat {
                    hits: key_hits,
                    observed_percent,
                    expected_percent,
                },
            )
        })
        .collect();

    tracing::debug!(draws = count, "Completed sampling run");
    DrawReport {
        draws: count,
        entries,
    }
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# weighttable Configuration
# ==========================
#
# Entries to load into the weight table, plus sampling and logging settings.

# ─────────────────────────────────────────────────────────────────────────────
# ENTRIES
# ─────────────────────────────────────────────────────────────────────────────
#
# Each entry is drawn with probability weight / (sum of all weights).
#
# Entry fields:
#   - key: Unique, non-empty identifier
#   - value: Payload returned alongside the key when drawn
#   - weight: Positive integer (higher = drawn more often)
#
# Repeating a key adds its weight to the earlier entry and replaces the value.

[[entries]]
key = "primary"
value = "http://primary:8080"
weight = 1000

[[entries]]
key = "secondary"
value = "http://secondary:8080"
weight = 500

[[entries]]
key = "canary"
value = "http://canary:8080"
weight = 1

# ─────────────────────────────────────────────────────────────────────────────
# SAMPLING
# ─────────────────────────────────────────────────────────────────────────────

[sampling]
# Draws performed by `weighttable draw` when --count is not given
draws = 100000

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error"
# RUST_LOG overrides this when set.
log_level = "info"
"#
}
