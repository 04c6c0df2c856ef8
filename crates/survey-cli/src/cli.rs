//! CLI argument definitions for the survey tool.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "survey",
    version,
    about = "Survey schema engine - validate definitions, check submissions, aggregate results",
    long_about = "Validate survey configurations, check submissions against them and\n\
                  aggregate stored submissions into zero-filled results documents."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Validate a survey configuration.
    CheckConfig(CheckConfigArgs),

    /// Check one submission against a configuration.
    CheckSubmission(CheckSubmissionArgs),

    /// Aggregate submissions into a results document.
    Results(ResultsArgs),

    /// List all supported field types.
    FieldTypes,
}

#[derive(Parser)]
pub struct CheckConfigArgs {
    /// Path to the configuration JSON file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

#[derive(Parser)]
pub struct CheckSubmissionArgs {
    /// Path to the configuration JSON file.
    #[arg(long = "config", value_name = "CONFIG")]
    pub config: PathBuf,

    /// Path to the submission JSON file.
    #[arg(value_name = "SUBMISSION")]
    pub submission: PathBuf,

    /// Evaluate the submission window at this time (RFC 3339, default: now).
    #[arg(long = "at", value_name = "TIME")]
    pub at: Option<DateTime<Utc>>,

    /// Skip the draft/start/end window check.
    #[arg(long = "ignore-window")]
    pub ignore_window: bool,
}

#[derive(Parser)]
pub struct ResultsArgs {
    /// Path to the configuration JSON file.
    #[arg(long = "config", value_name = "CONFIG")]
    pub config: PathBuf,

    /// Submissions as a JSON array or JSON Lines.
    #[arg(long = "submissions", value_name = "FILE")]
    pub submissions: PathBuf,

    /// Also write the results document to this path.
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the results document as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
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
