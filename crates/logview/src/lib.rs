//! `logview` - terminal client for the logsys log ingestion service
//!
//! This library provides the command-line surface of the client: CLI
//! parsing, configuration, logging, rendering, and the interactive logs
//! screen. The HTTP client itself lives in the `logview-client` crate.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod logs;
pub mod render;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
