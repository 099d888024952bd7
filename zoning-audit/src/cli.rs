use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "zoning-audit")]
#[command(about = "Aggregate and audit Fibre Channel SAN zoning snapshots")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Run the full aggregation and print a summary.
    Aggregate(AggregateArgs),
    /// Show per-zone statistics and findings.
    Zones(ZonesArgs),
    /// Show fabric rollups and label asymmetry.
    Fabrics(FabricsArgs),
}

#[derive(Parser, Debug)]
pub struct AggregateArgs {
    pub snapshot: PathBuf,
    /// TOML settings file; built-in defaults when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Write the full JSON report to this path.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Fail when any fabric could not be analyzed.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Parser, Debug)]
pub struct ZonesArgs {
    pub snapshot: PathBuf,
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// Only list zones carrying at least one finding.
    #[arg(long)]
    pub notes_only: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct FabricsArgs {
    pub snapshot: PathBuf,
    #[arg(long)]
    pub settings: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
