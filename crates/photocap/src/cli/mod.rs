//! Command-line interface for photocap.
//!
//! This module provides the CLI structure and command handlers for the
//! `photocap` binary.

mod commands;
pub mod session;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{CaptureCommand, ClearCommand, ConfigCommand, StatusCommand};

/// photocap - capture frames and mirror them to storage
///
/// Captures frames from a video input into a persistent local sequence and
/// mirrors each capture to a remote storage service on a best-effort basis.
#[derive(Debug, Parser)]
#[command(name = "photocap")]
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
    /// Run a capture session
    Capture(CaptureCommand),

    /// Show the local sequence and sync settings
    Status(StatusCommand),

    /// Clear the local capture sequence
    Clear(ClearCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
