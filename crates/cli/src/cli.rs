//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// bulk - batch commands read from stdin and fan them out to sinks
#[derive(Parser, Debug)]
#[command(
    name = "bulk",
    author,
    version,
    about = "Batch commands from stdin into bulks",
    long_about = "Reads one command per line from stdin and groups them into bulks.\n\n\
                  Bulks close every THRESHOLD commands, or at the matching '}' of a \n\
                  '{ ... }' block. Each bulk is printed to stdout and written to a \n\
                  file by a pool of workers. Per-thread statistics follow at the end."
)]
pub struct Cli {
    /// Number of commands per bulk outside of '{ }' blocks (overrides --config)
    #[arg(
        value_name = "THRESHOLD",
        allow_negative_numbers = true,
        env = "BULK_THRESHOLD"
    )]
    pub threshold: Option<String>,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, env = "BULK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of file-writing workers (0 disables file output)
    #[arg(long, env = "BULK_FILE_WORKERS")]
    pub file_workers: Option<usize>,

    /// Directory receiving bulk_*.log files
    #[arg(long, env = "BULK_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Do not print bulks to stdout
    #[arg(long)]
    pub no_console: bool,

    /// What to do with a '{' block still open at end of input
    #[arg(long, value_enum, env = "BULK_UNTERMINATED_BLOCK")]
    pub unterminated_block: Option<BlockPolicy>,

    /// Statistics report format
    #[arg(long, value_enum, default_value = "text", env = "BULK_STATS_FORMAT")]
    pub stats_format: StatsFormat,

    /// Validate configuration, print it, and exit without reading stdin
    #[arg(long)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, env = "BULK_VERBOSE")]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (logs always go to stderr)
    #[arg(long, value_enum, default_value = "compact", env = "BULK_LOG_FORMAT")]
    pub log_format: LogFormat,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "BULK_METRICS_PORT")]
    pub metrics_port: u16,
}

impl Cli {
    /// Log level used when RUST_LOG is unset
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// End-of-stream handling for an open block
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockPolicy {
    /// Drop the buffered commands
    Discard,
    /// Emit them as a final bulk
    Flush,
}

impl From<BlockPolicy> for contracts::UnterminatedBlockPolicy {
    fn from(policy: BlockPolicy) -> Self {
        match policy {
            BlockPolicy::Discard => Self::Discard,
            BlockPolicy::Flush => Self::Flush,
        }
    }
}

/// Statistics report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatsFormat {
    /// One line per thread
    #[default]
    Text,
    /// JSON array of stats
    Json,
    /// No report
    None,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    #[default]
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
