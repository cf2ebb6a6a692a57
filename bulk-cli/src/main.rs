//! `bulk` command-line entry point

use bulk_cli::{Cli, CliResult};
use clap::Parser;

fn main() -> CliResult<()> {
    Cli::parse().execute()
}
