use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use zoning_audit::pipeline::{aggregate, ZoningReport};
use zoning_audit::settings::{default_settings, load_settings};

mod aggregate_cmd;
mod cli;
mod fabrics_cmd;
mod zones_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Aggregate(args) => aggregate_cmd::run_aggregate(args),
        Command::Zones(args) => zones_cmd::run_zones(args),
        Command::Fabrics(args) => fabrics_cmd::run_fabrics(args),
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load a snapshot plus settings and run the whole pipeline.
pub(crate) fn run_pipeline(snapshot: &Path, settings: Option<&Path>) -> Result<ZoningReport> {
    let settings = match settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("failed to load settings {}", path.display()))?,
        None => default_settings(),
    };
    let snapshot = san_snapshot::parse_file(snapshot)
        .with_context(|| format!("failed to parse {}", snapshot.display()))?;
    let report = aggregate(&snapshot, &settings).context("aggregation failed")?;
    Ok(report)
}
