//! Command-line interface for aerobank.
//!
//! This module provides the CLI structure and command arguments for the
//! `aerobank` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ChartArg, ConfigCommand, GroupByArg, ListCommand, OutputFormat, SeriesCommand, ShowCommand,
    StatsCommand,
};

/// aerobank - Explore aircraft and bird flight performance data
///
/// Loads the aircraft and bird datasets, classifies every record and
/// answers listing, lookup, charting and summary queries.
#[derive(Debug, Parser)]
#[command(name = "aerobank")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List records, optionally searched, filtered and sorted
    List(ListCommand),

    /// Show one record with its classification and derived metrics
    Show(ShowCommand),

    /// Build a chart series as JSON, with optional trendlines
    Series(SeriesCommand),

    /// Count records per kind and category
    Stats(StatsCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
