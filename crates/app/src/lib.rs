//! Sonde command-line front end.
//!
//! Parses arguments, wires configuration, the reqwest client and the
//! scenario runner together and renders the report. The binary only maps
//! the outcome onto an exit code.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

pub use cli::{CheckArgs, Cli, Commands, OutputFormat, RunArgs};
pub use error::{AppError, AppResult};
