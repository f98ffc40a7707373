// SPDX-License-Identifier: Apache-2.0

//! Command-line interface definition for revq.
//!
//! Uses clap's derive API for declarative CLI parsing with noun-verb
//! subcommands.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Output format for CLI results.
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with colors (default)
    #[default]
    Text,
    /// JSON output for programmatic consumption
    Json,
}

/// Global output configuration passed to commands.
#[derive(Clone)]
pub struct OutputContext {
    /// Output format (text, json)
    pub format: OutputFormat,
    /// Suppress non-essential output
    pub quiet: bool,
    /// Enable verbose output
    pub verbose: bool,
    /// Whether stdout is a terminal (TTY)
    pub is_tty: bool,
}

impl OutputContext {
    /// Creates an `OutputContext` from CLI arguments.
    #[must_use]
    pub fn from_cli(format: OutputFormat, quiet: bool, verbose: bool) -> Self {
        Self {
            format,
            quiet,
            verbose,
            is_tty: std::io::stdout().is_terminal(),
        }
    }

    /// Returns true if colors and decorations should be shown.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.is_tty && !self.quiet && matches!(self.format, OutputFormat::Text)
    }
}

/// revq - GitHub pull request review triage automation.
///
/// Classifies actors and comments, analyzes conversation threads, and
/// turns PR events into prioritized labels and reply actions.
#[derive(Parser)]
#[command(name = "revq")]
#[command(version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format (text, json)
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug-level logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Repository context for bare PR numbers (e.g., "owner/repo")
    #[arg(long, short = 'r', global = true)]
    pub repo: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full review workflow on a pull request
    Review {
        /// PR reference (URL, owner/repo#number, or number with --repo)
        reference: String,
    },

    /// Analyze conversation threads on a pull request
    Threads {
        /// PR reference (URL, owner/repo#number, or number with --repo)
        reference: String,

        /// Show only threads needing a response
        #[arg(long)]
        needs_response: bool,
    },

    /// Classify an actor as bot or human
    Classify {
        /// Actor login
        login: String,

        /// Actor display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Triage a PR event into suggested labels and actions
    Triage {
        /// Path to an event JSON file ("-" for stdin)
        #[arg(long, default_value = "-")]
        event: PathBuf,

        /// Additional policy file merged over the configured policy
        #[arg(long)]
        policy: Option<PathBuf>,
    },

    /// Apply a batch of actions to GitHub
    Apply {
        /// Path to an actions JSON file ("-" for stdin)
        #[arg(long, default_value = "-")]
        file: PathBuf,

        /// Report actions without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show GitHub API rate limit status
    Status,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
