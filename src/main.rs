//! finanzlage main entry point

use anyhow::Context;
use clap::{Parser, Subcommand};
use finanzlage_config::{Config, ConfigError};
use finanzlage_core::{CoreError, Pipeline};
use finanzlage_parser::CsvReportReader;
use finanzlage_render::{render, write_outputs, OutputWriter};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "finanzlage")]
#[command(version = "0.1.0")]
#[command(about = "Yearly financial overview from German accounting exports", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "finanzlage.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Aggregate the reports, update the development table and write all outputs
    Run,
    /// Print the default configuration
    DefaultConfig,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match args.command.unwrap_or(Command::Run) {
        Command::DefaultConfig => {
            print!("{}", Config::generate_default());
            ExitCode::SUCCESS
        }
        Command::Run => {
            let config = load_config(&args.config);
            let level = config
                .as_ref()
                .map(|(c, _)| c.logging.level.clone())
                .unwrap_or_else(|_| "info".to_string());
            init_logging(&level);

            let result = config
                .map_err(anyhow::Error::from)
                .and_then(|(config, from_file)| {
                    if !from_file {
                        warn!("{} not found, using built-in defaults", args.config.display());
                    }
                    run(config)
                });

            match result {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    report(&e);
                    ExitCode::from(1)
                }
            }
        }
    }
}

/// RUST_LOG wins over the configured level
fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Load the configuration; a missing file yields the defaults
fn load_config(path: &Path) -> Result<(Config, bool), ConfigError> {
    if !path.exists() {
        return Ok((Config::default(), false));
    }
    Config::load(path).map(|config| (config, true))
}

fn run(config: Config) -> anyhow::Result<()> {
    info!("Data directory: {}", config.data.path.display());

    let result_dir = config.result_path();
    let pipeline = Pipeline::new(config.clone(), Arc::new(CsvReportReader))?;
    let data = pipeline.run()?;

    let output = render(&data, &config);
    let writer = OutputWriter::new(&result_dir)
        .with_context(|| format!("preparing {}", result_dir.display()))?;
    let written = write_outputs(&output, &writer)?;

    info!(
        "Finished: {} files in {}, presentation outline {}",
        written.len(),
        result_dir.display(),
        output.deck.file_name
    );
    Ok(())
}

fn report(err: &anyhow::Error) {
    if let Some(core) = err.downcast_ref::<CoreError>() {
        error!("{}", core.to_details());
    } else if let Some(config) = err.downcast_ref::<ConfigError>() {
        error!("{}", config.to_details());
    } else {
        error!("{:#}", err);
    }
}
