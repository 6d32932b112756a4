//! CLI argument definitions for the fedprep simulator.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "fedprep",
    version,
    about = "Fit scalers over data split across owners",
    long_about = "Simulate federated preprocessing on local CSV files.\n\n\
                  Each --part names the owner holding one fragment. Row splits\n\
                  share columns; column splits share rows."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fit a scaler, transform the fragments and print the fitted parameters.
    Fit(FitArgs),

    /// Print count, mean, std, min and max of every column.
    Describe(FrameArgs),
}

/// Flags describing how the data is split and who merges it.
#[derive(Args, Debug, Clone)]
pub struct FrameArgs {
    /// How the fragments split the data.
    #[arg(long = "layout", value_enum)]
    pub layout: LayoutArg,

    /// One fragment as OWNER=CSV; repeat once per owner.
    #[arg(
        long = "part",
        value_name = "OWNER=CSV",
        value_parser = parse_part,
        required = true
    )]
    pub parts: Vec<PartArg>,

    /// Restrict to these columns (comma separated).
    #[arg(long = "columns", value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Owner that merges row-split statistics.
    #[arg(long = "aggregator", value_name = "OWNER", default_value = "server")]
    pub aggregator: String,

    /// Owner that compares row-split extremes.
    #[arg(long = "comparator", value_name = "OWNER", default_value = "server")]
    pub comparator: String,
}

#[derive(Args, Debug, Clone)]
pub struct FitArgs {
    #[command(flatten)]
    pub frame: FrameArgs,

    /// Scaler to fit.
    #[arg(long = "scaler", value_enum, default_value = "standard")]
    pub scaler: ScalerArg,

    /// JSON file with scaler options; flags below override it.
    #[arg(long = "options", value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Do not center columns (standard scaler).
    #[arg(long = "no-mean")]
    pub no_mean: bool,

    /// Do not divide by the standard deviation (standard scaler).
    #[arg(long = "no-std")]
    pub no_std: bool,

    /// Target range as LO,HI (min-max scaler).
    #[arg(
        long = "feature-range",
        value_name = "LO,HI",
        value_parser = parse_range,
        allow_hyphen_values = true
    )]
    pub feature_range: Option<(f64, f64)>,

    /// Write each owner's transformed fragment as CSV into this directory.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// One owner's CSV fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartArg {
    pub owner: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayoutArg {
    /// Owners hold different rows of the same columns.
    Horizontal,
    /// Owners hold different columns of the same rows.
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScalerArg {
    Standard,
    Minmax,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

fn parse_part(value: &str) -> Result<PartArg, String> {
    match value.split_once('=') {
        Some((owner, path)) if !owner.is_empty() && !path.is_empty() => Ok(PartArg {
            owner: owner.to_string(),
            path: PathBuf::from(path),
        }),
        _ => Err(format!("expected OWNER=CSV, got '{value}'")),
    }
}

fn parse_range(value: &str) -> Result<(f64, f64), String> {
    let (lo, hi) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LO,HI, got '{value}'"))?;
    let parse = |bound: &str| {
        bound
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid bound '{bound}': {e}"))
    };
    Ok((parse(lo)?, parse(hi)?))
}
