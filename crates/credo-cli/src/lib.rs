//! Credo CLI library.
//!
//! Reads an evidence graph from a JSON input document, runs evaluation
//! epochs through the engine, and prints or exports the results.

#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use cli::{Cli, Command};
pub use config::{Config, OutputFormat};
pub use error::{CliError, Result};
pub use input::InputDocument;
pub use output::Formatter;
