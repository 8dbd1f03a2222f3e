//! weighttable command-line tool
//!
//! Loads entries from a TOML config into a weight table, then reports
//! probabilities or samples the table.

use clap::Parser;
use std::collections::BTreeMap;
use weighttable::{
    AppResult,
    cli::{self, Cli, Command},
    config::{Config, MAX_DRAWS},
    error::AppError,
    telemetry,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Command::Config { output } => write_template(output.as_deref())?,
        Command::Probabilities { key } => {
            let config = load(&cli.config)?;
            println!("{}", probabilities(&config, key.as_deref())?);
        }
        Command::Draw { count } => {
            let config = load(&cli.config)?;
            println!("{}", draw(&config, *count)?);
        }
    }

    Ok(())
}

fn load(path: &str) -> AppResult<Config> {
    let config = Config::from_file(path)?;
    telemetry::init(&config.observability.log_level);
    tracing::info!(config = %path, entries = config.entries.len(), "Loaded configuration");
    Ok(config)
}

fn write_template(output: Option<&str>) -> AppResult<()> {
    let template = cli::generate_config_template();
    match output {
        Some(path) => {
            std::fs::write(path, template)?;
            eprintln!("Configuration template written to {}", path);
        }
        None => print!("{}", template),
    }
    Ok(())
}

fn probabilities(config: &Config, key: Option<&str>) -> AppResult<String> {
    let table = config.build_table()?;
    let report: BTreeMap<String, f64> = match key {
        Some(key) => {
            if !table.contains_key(key) {
                tracing::warn!(key = %key, "Key not present in table");
            }
            BTreeMap::from([(key.to_string(), table.get_probability(key))])
        }
        None => table.get_all_probabilities().into_iter().collect(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn draw(config: &Config, count: Option<u64>) -> AppResult<String> {
    let draws = count.unwrap_or(config.sampling.draws);
    if draws == 0 || draws > MAX_DRAWS {
        return Err(AppError::Config(format!(
            "--count must be between 1 and {}, got {}",
            MAX_DRAWS, draws
        )));
    }
    let table = config.build_table()?;
    let report = cli::sample(&table, draws);
    Ok(serde_json::to_string_pretty(&report)?)
}
