//! CLI argument definitions.
//!
//! All Clap derive structs for `overture` command-line parsing.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

// ============================================================================
// Root CLI
// ============================================================================

/// Scripted single-run presentation player.
#[derive(Parser, Debug)]
#[command(name = "overture", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "OVERTURE_COLOR")]
    pub color: ColorChoice,

    /// Log output format.
    #[arg(long, default_value = "human", global = true)]
    pub log_format: LogFormatChoice,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Play the presentation in the terminal.
    Run(RunArgs),

    /// Validate script files without playing them.
    Validate(ValidateArgs),

    /// Print the nominal cue schedule for a script.
    Timeline(TimelineArgs),
}

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to a YAML script file. Built-in defaults play when omitted.
    #[arg(short, long, env = "OVERTURE_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Treat the globe renderer as unavailable and skip its sequence.
    #[arg(long)]
    pub no_globe: bool,

    /// Comma-separated triggers (begin, retry, accept) to play
    /// automatically instead of reading stdin.
    #[arg(long, value_name = "TRIGGERS")]
    pub headless_input: Option<String>,

    /// Seed for the retry relocation offsets.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Script files to validate.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Enable strict validation (warnings become errors).
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for `timeline`.
#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Path to a YAML script file. Built-in defaults apply when omitted.
    #[arg(short, long, env = "OVERTURE_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Emit the schedule as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Log format choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatChoice {
    /// Human-readable log lines.
    #[default]
    Human,
    /// Structured JSON log lines.
    Json,
}

// ============================================================================
// Tests
// ============================================================================
