//! CLI definition using clap

use auction_types::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "auction-stats")]
#[command(version)]
#[command(about = "Aggregate statistics over auction listing CSV exports")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Parallel file loads. 0 = auto (CPU count). Uses config value if not specified.
    #[arg(long, short = 'j', global = true)]
    pub jobs: Option<usize>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full report: statistics, top makes and models, sample auction
    Report {
        /// CSV files or directories (default: configured data dir)
        paths: Vec<PathBuf>,

        /// Number of top makes to show
        #[arg(long, short = 'n', default_value = "10")]
        top: usize,
    },

    /// Summary statistics only
    Stats {
        /// CSV files or directories (default: configured data dir)
        paths: Vec<PathBuf>,
    },

    /// Most frequent makes or models
    Top {
        /// CSV files or directories (default: configured data dir)
        paths: Vec<PathBuf>,

        /// Rank "Make Model" combinations instead of makes
        #[arg(long)]
        models: bool,

        /// Number of entries to show
        #[arg(long, short = 'n', default_value = "10")]
        count: usize,
    },

    /// Filter auctions and list matches or group counts
    Filter {
        /// CSV files or directories (default: configured data dir)
        paths: Vec<PathBuf>,

        /// Minimum vehicle year (inclusive)
        #[arg(long)]
        min_year: Option<i32>,

        /// Maximum vehicle year (inclusive)
        #[arg(long)]
        max_year: Option<i32>,

        /// Keep only these makes (case-insensitive, repeatable)
        #[arg(long)]
        make: Vec<String>,

        /// Keep only this vehicle type (e.g. "Automobiles", "SUV")
        #[arg(long)]
        vehicle_type: Option<String>,

        /// Keep auctions on or after this UTC date (YYYY-MM-DD)
        #[arg(long)]
        after: Option<String>,

        /// Keep auctions on or before this UTC date (YYYY-MM-DD)
        #[arg(long)]
        before: Option<String>,

        /// Print group counts instead of a listing
        #[arg(long)]
        group_by: Option<GroupKey>,
    },

    /// Average mileage per model year
    Mileage {
        /// CSV files or directories (default: configured data dir)
        paths: Vec<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set default output format
        #[arg(long)]
        set_format: Option<OutputFormat>,

        /// Set default parallel file loads (0 = auto)
        #[arg(long)]
        set_jobs: Option<usize>,

        /// Set default data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

/// Grouping key for `filter --group-by`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GroupKey {
    Make,
    Branch,
    Type,
}
