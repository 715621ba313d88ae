//! Command-line interface for herolog.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, CategoryArg, CheckUrlCommand, ConfigCommand, DeleteCommand, EditCommand,
    ExportCommand, ListCommand, OutputFormat, ShowCommand, StatsCommand, TimelineCommand,
};

use crate::logging::Verbosity;

/// herolog - Keep a logbook of your hero's actions
///
/// Records flag captures, arrests and other actions with dates, descriptions
/// and images, and shows them as per-category timelines.
#[derive(Debug, Parser)]
#[command(name = "herolog")]
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
    /// Record a new action
    Add(AddCommand),

    /// Modify an existing action
    Edit(EditCommand),

    /// Delete an action
    Delete(DeleteCommand),

    /// Show one action with its images
    Show(ShowCommand),

    /// Show the per-category timelines
    Timeline(TimelineCommand),

    /// List actions for management
    List(ListCommand),

    /// Count actions per category
    Stats(StatsCommand),

    /// Export all actions as JSON
    Export(ExportCommand),

    /// Check that an image URL loads
    CheckUrl(CheckUrlCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}
