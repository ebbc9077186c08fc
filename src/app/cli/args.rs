//! Command-line arguments
//!
//! Global flags configure the store, table and logging; each subcommand
//! carries its own options. Values given here take precedence over the
//! configuration file.

use crate::core::validation::{validate_count, validate_non_empty};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "sprinkler")]
#[command(about = "Multi-consumer queue over a key-value store")]
#[command(version)]
#[command(long_version = crate::core::version::long_version())]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'C', long = "config-file", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Name of the table to work against
    #[arg(short = 't', long = "table", value_name = "NAME", global = true, value_parser = validate_non_empty)]
    pub table: Option<String>,

    /// Store location: a JSON file path, or 'memory' for a throwaway store
    #[arg(short = 'S', long = "store", value_name = "PATH", global = true)]
    pub store: Option<String>,

    /// Timeout in seconds for each store operation
    #[arg(short = 'T', long = "timeout", value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Force colored output
    #[arg(long = "color", global = true)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color", global = true)]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", global = true, value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", global = true, value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// More output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Less output (repeat for less)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create the table; asks before replacing an existing one
    #[command(visible_alias = "i")]
    Init(InitArgs),

    /// Stream generated records into the table
    #[command(visible_alias = "s")]
    Stream(StreamArgs),

    /// Receive records for one destination and acknowledge them
    #[command(visible_alias = "r")]
    Receive(ReceiveArgs),
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq, Default)]
pub struct InitArgs {
    /// Replace an existing table without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct StreamArgs {
    /// Milliseconds to wait between records
    #[arg(short = 'd', long = "delay", value_name = "MS", default_value_t = 10)]
    pub delay: u64,

    /// Records to send; -1 sends until interrupted
    #[arg(short = 'c', long = "count", value_name = "N", default_value = "100", value_parser = validate_count, allow_hyphen_values = true)]
    pub count: ::std::option::Option<usize>,

    /// Seed for generated payload sums (defaults to the current time)
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Provenance written on every record
    #[arg(short = 'p', long = "provenance", value_name = "URL", default_value = "https://localhost:8000/")]
    pub provenance: String,
}

#[derive(ClapArgs, Debug, Clone, PartialEq, Eq)]
pub struct ReceiveArgs {
    /// Destination to read for
    #[arg(short = 'd', long = "destination", value_name = "NAME", default_value = "primary")]
    pub destination: String,

    /// Status to read
    #[arg(long = "status", value_name = "STATUS", default_value = crate::queue::Status::READY)]
    pub status: String,

    /// Maximum records to receive
    #[arg(short = 'c', long = "count", value_name = "N", default_value_t = 100, value_parser = crate::core::validation::validate_positive_int)]
    pub count: usize,

    /// Status to set when acknowledging
    #[arg(long = "ack-status", value_name = "STATUS", default_value = crate::queue::Status::DELIVERED)]
    pub ack_status: String,

    /// Acknowledge without asking
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

impl Args {
    /// Log level from `--log-level`, else derived from -v/-q around `base`
    pub fn effective_log_level(&self, base: Option<&str>) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
        let base = base.unwrap_or("info");
        let position = LEVELS.iter().position(|l| *l == base).unwrap_or(3) as i32;
        let adjusted = (position + self.verbose as i32 - self.quiet as i32).clamp(0, 5);
        LEVELS[adjusted as usize].to_string()
    }
}
