//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tag filter, word search and sort for static blog post listings
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Config file name (default: postfilter.toml)
    #[arg(short = 'C', long, default_value = "postfilter.toml")]
    pub config: PathBuf,

    /// Do not log to stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Interactions applied to the page, in this order: tag clicks, search, sort clicks
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Click the tag button with this label (repeatable, clicked in order)
    #[arg(short, long = "tag", value_name = "LABEL")]
    pub tags: Vec<String>,

    /// Type this into the search box and press Enter
    #[arg(short, long, value_name = "TERM")]
    pub search: Option<String>,

    /// Click the sort button this many times
    #[arg(long, value_name = "CLICKS", default_value_t = 0)]
    pub sort: usize,
}

/// Shared output arguments for Apply and Replay commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Write the page here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Inject the stylesheet hiding filtered posts
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub style: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Apply tag clicks, a search and sort clicks to a page and render it
    Apply {
        /// Listing page to process
        page: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Replay a timed event script against a page and render it
    Replay {
        /// Listing page to process
        page: PathBuf,

        /// Event script (TOML, `[[event]]` entries)
        script: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// List the posts and tags of a page with their filter state
    Inspect {
        /// Listing page to inspect
        page: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Output arguments of commands that render a page.
    pub const fn render_args(&self) -> Option<&RenderArgs> {
        match &self.command {
            Commands::Apply { render, .. } | Commands::Replay { render, .. } => Some(render),
            Commands::Inspect { .. } => None,
        }
    }
}
