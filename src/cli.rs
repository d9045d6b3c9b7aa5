//! CLI argument parsing for the batch mailer.
//!
//! The CLI stays thin: subcommands wire the pipeline together without
//! embedding policy, so the same core can be driven from tests.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "certmail",
    version,
    about = "Send personalized certificate emails from a roster",
    after_help = "Examples:\n  certmail check --config config.json\n  certmail run --config config.json --log-file email_sending.log",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Run(RunArgs),
    Check(CheckArgs),
}

/// Inputs for a full sending run.
#[derive(Parser, Debug)]
#[command(about = "Send certificate emails for every roster row")]
pub struct RunArgs {
    /// JSON configuration file (sender, roster, attachments, credentials)
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Append the audit log to this file instead of writing it to stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Emit per-row progress events
    #[arg(long)]
    pub verbose: bool,
}

/// Inputs for a non-sending preflight of the roster and attachment store.
#[derive(Parser, Debug)]
#[command(about = "Validate the roster and attachments without sending")]
pub struct CheckArgs {
    /// JSON configuration file (sender, roster, attachments, credentials)
    #[arg(long, value_name = "PATH")]
    pub config: PathBuf,

    /// Emit per-row progress events
    #[arg(long)]
    pub verbose: bool,
}
