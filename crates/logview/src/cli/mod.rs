//! Command-line interface for logview.
//!
//! This module provides the CLI structure and argument types for the
//! `logview` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, LoginCommand, LogsCommand, ProjectCommand};

/// logview - browse the logsys log service from your terminal
///
/// A client for the logsys log ingestion service: log in, manage projects
/// and their API keys, and search aggregated and individual log events.
#[derive(Debug, Parser)]
#[command(name = "logview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server URL, overriding the configured one
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

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
    /// Log in and save the session
    Login(LoginCommand),

    /// Log out and clear the saved session
    Logout,

    /// Show the currently logged-in user
    Whoami,

    /// List and create projects, reveal API keys
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Browse a project's logs
    Logs(LogsCommand),

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
