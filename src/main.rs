//! sentrydata-gen - regenerate the Go constant tables from Sentry's sources.

use anyhow::Context;
use clap::Parser;
use sentrydata_gen::{CheckOutcome, Cli, OutputFormat, OutputWriter};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// `Ok(false)` means `--check` found drift
fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let config = cli.resolve_config().context("invalid configuration")?;
    info!(
        "generating from {}@{}{}",
        config.repository,
        config.revision,
        config
            .source_dir
            .as_ref()
            .map(|dir| format!(" (checkout at {})", dir.display()))
            .unwrap_or_default()
    );

    let provider = sentrydata_gen::source_provider(&config)?;
    let rendered = sentrydata_gen::generate(&config, provider.as_ref(), cli.format)
        .context("generation failed")?;

    if cli.stdout {
        print!("{rendered}");
        return Ok(true);
    }

    let writer = OutputWriter::new(&config.output)
        .with_gofmt(config.gofmt && cli.format == OutputFormat::Go);

    if cli.check {
        let outcome = writer
            .check(&rendered)
            .with_context(|| format!("failed to check {}", config.output.display()))?;
        return Ok(match outcome {
            CheckOutcome::UpToDate => {
                info!("{} is up to date", config.output.display());
                true
            }
            CheckOutcome::Drifted => {
                warn!("{} is out of date; rerun sentrydata-gen", config.output.display());
                false
            }
        });
    }

    writer
        .write(&rendered)
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    Ok(true)
}
