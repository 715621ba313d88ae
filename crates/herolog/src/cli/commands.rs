//! CLI command definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use crate::event::{Category, EventId};
use crate::presentation::ListFilter;

/// Arguments of `add`.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Title of the action
    #[arg(short, long)]
    pub title: String,

    /// Kind of action
    #[arg(short = 'k', long, value_enum, default_value = "flags")]
    pub category: CategoryArg,

    /// Day of the action (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Free-text description
    #[arg(short = 'm', long, default_value = "")]
    pub description: String,

    /// Image URL (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// Image file to compress and embed (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Skip checking that URLs load as images
    #[arg(long)]
    pub no_check: bool,
}

/// Arguments of `edit`. Omitted fields keep their current value.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the action to edit
    pub id: EventId,

    /// New title
    #[arg(short, long)]
    pub title: Option<String>,

    /// New kind of action
    #[arg(short = 'k', long, value_enum)]
    pub category: Option<CategoryArg>,

    /// New day (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// New description
    #[arg(short = 'm', long)]
    pub description: Option<String>,

    /// Replacement image URL (repeatable)
    #[arg(short, long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// Image file to add (repeatable)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Skip checking that URLs load as images
    #[arg(long)]
    pub no_check: bool,
}

/// Arguments of `delete`.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the action to delete
    pub id: EventId,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments of `show`.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Id of the action to show
    pub id: EventId,

    /// Carousel page to display (1-based)
    #[arg(short, long)]
    pub page: Option<usize>,
}

/// Arguments of `timeline`.
#[derive(Debug, Args)]
pub struct TimelineCommand {
    /// Only show this category
    #[arg(short = 'k', long, value_enum)]
    pub category: Option<CategoryArg>,
}

/// Arguments of `list`.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Category filter (`all`, `flags`, `arrests`, `other`)
    #[arg(long)]
    pub filter: Option<ListFilter>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments of `stats`.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Arguments of `export`.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments of `check-url`.
#[derive(Debug, Args)]
pub struct CheckUrlCommand {
    /// URL to normalize and probe
    pub url: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Category argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Flag capture
    Flags,
    /// Arrest
    Arrests,
    /// Any other action
    Other,
}

impl From<CategoryArg> for Category {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Flags => Self::Flags,
            CategoryArg::Arrests => Self::Arrests,
            CategoryArg::Other => Self::Other,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_arg_conversion() {
        assert_eq!(Category::from(CategoryArg::Flags), Category::Flags);
        assert_eq!(Category::from(CategoryArg::Arrests), Category::Arrests);
        assert_eq!(Category::from(CategoryArg::Other), Category::Other);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
