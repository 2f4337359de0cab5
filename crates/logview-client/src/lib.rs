//! `logview-client` - HTTP client for the logsys log ingestion API
//!
//! This library wraps the logsys REST surface: authentication, project
//! management, per-project API keys, and aggregated/individual log queries.
//! It also provides the on-disk session store used to carry the login
//! cookie between invocations.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod models;
pub mod session;

pub use client::ApiClient;
pub use error::{Error, Result};
pub use models::{AggregatedLogEntry, ApiKey, LogEntry, LogQuery, NewProject, Project, User};
pub use session::{SavedSession, Session, SessionStore};
