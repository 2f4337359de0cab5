//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use logview_client::LogQuery;

/// Login command arguments.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Username to log in as
    pub username: String,

    /// Password (read from stdin when omitted)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Project management commands.
#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List projects
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Create a project
    Create {
        /// Project name
        #[arg(short, long)]
        name: String,

        /// Free-form description
        #[arg(short, long)]
        description: Option<String>,

        /// Comma-separated payload keys to index for search
        #[arg(short, long, default_value = "")]
        searchable_keys: String,

        /// Log retention in seconds
        #[arg(short = 't', long, default_value = "604800")]
        log_ttl_seconds: u64,
    },

    /// Reveal a project's API key
    ApiKey {
        /// The project id
        project_id: String,

        /// Copy the key to the system clipboard
        #[arg(long)]
        copy: bool,
    },
}

/// Logs command arguments.
#[derive(Debug, Args)]
pub struct LogsCommand {
    /// The project id
    pub project_id: String,

    /// Project name for the header (resolved from the server when omitted)
    #[arg(long)]
    pub project_name: Option<String>,

    /// Restrict to events with this name
    #[arg(short, long)]
    pub event_name: Option<String>,

    /// Lower bound on event time (e.g. "2026-08-01T00:00")
    #[arg(long)]
    pub start_time: Option<String>,

    /// Upper bound on event time
    #[arg(long)]
    pub end_time: Option<String>,

    /// Search-key filter expression (passed through to the server)
    #[arg(short, long)]
    pub search_keys: Option<String>,

    /// Print the aggregated list as JSON and exit (non-interactive)
    #[arg(short, long)]
    pub json: bool,
}

impl LogsCommand {
    /// Build the initial search filter from the flags, dropping empty
    /// values.
    #[must_use]
    pub fn filter(&self) -> LogQuery {
        LogQuery {
            event_name: non_empty(&self.event_name),
            start_time: non_empty(&self.start_time),
            end_time: non_empty(&self.end_time),
            search_keys: non_empty(&self.search_keys),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(ToString::to_string)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn logs_command() -> LogsCommand {
        LogsCommand {
            project_id: "p1".to_string(),
            project_name: None,
            event_name: None,
            start_time: None,
            end_time: None,
            search_keys: None,
            json: false,
        }
    }

    #[test]
    fn test_logs_filter_empty_flags_make_empty_query() {
        let cmd = logs_command();
        assert!(cmd.filter().is_empty());
    }

    #[test]
    fn test_logs_filter_drops_empty_strings() {
        let cmd = LogsCommand {
            event_name: Some(String::new()),
            search_keys: Some("user_id=42".to_string()),
            ..logs_command()
        };
        let filter = cmd.filter();
        assert!(filter.event_name.is_none());
        assert_eq!(filter.search_keys.as_deref(), Some("user_id=42"));
    }

    #[test]
    fn test_logs_filter_keeps_set_fields() {
        let cmd = LogsCommand {
            event_name: Some("signup".to_string()),
            start_time: Some("2026-08-01T00:00".to_string()),
            ..logs_command()
        };
        let filter = cmd.filter();
        assert_eq!(filter.event_name.as_deref(), Some("signup"));
        assert_eq!(filter.start_time.as_deref(), Some("2026-08-01T00:00"));
        assert!(filter.end_time.is_none());
    }

    #[test]
    fn test_project_command_debug() {
        let cmd = ProjectCommand::List { json: false };
        assert!(format!("{cmd:?}").contains("List"));
    }

    #[test]
    fn test_login_command_debug_contains_username_field() {
        let cmd = LoginCommand {
            username: "admin".to_string(),
            password: None,
        };
        assert!(format!("{cmd:?}").contains("username"));
    }
}
