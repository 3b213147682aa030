//! `bulk` run implementation.

use config_loader::ConfigLoader;
use contracts::{BulkConfig, ContractError};
use tracing::info;

use crate::cli::Cli;
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute a run: resolve configuration, process stdin, print the report
pub async fn run_pipeline(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;

    info!(
        threshold = config.batching.threshold,
        unterminated_block = ?config.batching.unterminated_block,
        console = config.sinks.console,
        file_workers = config.sinks.file_workers,
        output_dir = %config.sinks.output_dir.display(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print!("{}", ConfigLoader::to_toml(&config)?);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig { bulk: config });
    let outcome = pipeline.run().await?;
    outcome.stats.print_report(cli.stats_format)?;

    match outcome.failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Build the run configuration from the config file and CLI overrides
///
/// The positional threshold wins over the file. The result is validated, so
/// a bad threshold is reported before any sink is created.
pub fn resolve_config(cli: &Cli) -> std::result::Result<BulkConfig, ContractError> {
    let threshold = cli
        .threshold
        .as_deref()
        .map(ConfigLoader::parse_threshold)
        .transpose()?;

    let mut config = match (&cli.config, threshold) {
        (Some(path), _) => {
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)?
        }
        (None, Some(threshold)) => BulkConfig::with_threshold(threshold),
        (None, None) => {
            return Err(ContractError::config_validation(
                "threshold",
                "missing: pass THRESHOLD or --config",
            ))
        }
    };

    // Apply CLI overrides
    if let Some(threshold) = threshold {
        config.batching.threshold = threshold;
    }
    if let Some(policy) = cli.unterminated_block {
        config.batching.unterminated_block = policy.into();
    }
    if cli.no_console {
        config.sinks.console = false;
    }
    if let Some(workers) = cli.file_workers {
        config.sinks.file_workers = workers;
    }
    if let Some(dir) = &cli.output_dir {
        config.sinks.output_dir = dir.clone();
    }

    ConfigLoader::validate(&config)?;
    Ok(config)
}
