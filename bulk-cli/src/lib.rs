//! Bulk CLI library
//!
//! This library provides the command-line driver for the bulk batcher:
//! argument parsing, configuration, input reading and the run loop.

pub mod args;
pub mod config;
pub mod error;
pub mod input;
pub mod runner;

pub use args::Cli;
pub use error::{CliError, CliResult};
