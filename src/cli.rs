//! CLI argument parsing for cpuload

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary table (default)
    Text,
    /// JSON report for machine parsing
    Json,
    /// Overall load as CSV
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "cpuload")]
#[command(version)]
#[command(about = "Calculate CPU load over time from CPU running slices", long_about = None)]
pub struct Cli {
    /// CSV of running slices with ts_ns, ts_end_ns and ucpu columns
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Window size in milliseconds (default: sized for ~--points windows)
    #[arg(long = "window-size-ms", value_name = "MS")]
    pub window_size_ms: Option<i64>,

    /// Window move (step) in milliseconds (default: equal to the window size)
    #[arg(long = "window-move-ms", value_name = "MS")]
    pub window_move_ms: Option<i64>,

    /// Approximate number of windows when size/move are not given
    #[arg(long = "points", value_name = "N", default_value = "200")]
    pub points: i64,

    /// Refuse to compute more windows than this
    #[arg(long = "max-windows", value_name = "N", default_value = "2000")]
    pub max_windows: usize,

    /// Cap each CPU row at 100% before aggregating
    #[arg(long = "cap-per-cpu")]
    pub cap_per_cpu: bool,

    /// Output format (text, json or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Base path to save the load as <BASE>_overall.csv and <BASE>_per_core.csv
    #[arg(short = 'o', long = "output", value_name = "BASE")]
    pub output: Option<PathBuf>,

    /// Report time spent in each phase of the computation
    #[arg(long = "profile-self")]
    pub profile_self: bool,

    /// Enable debug logging to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
