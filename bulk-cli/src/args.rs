//! Command-line arguments

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::{input, runner};
use clap::Parser;
use std::io;
use std::path::PathBuf;

/// Group command lines into bulks and log them to the console and files
#[derive(Debug, Parser)]
#[command(name = "bulk", version, about)]
pub struct Cli {
    /// Number of commands per bulk
    #[arg(
        value_name = "SIZE",
        value_parser = parse_group_size,
        required_unless_present = "print_config"
    )]
    pub size: Option<usize>,

    /// Read commands from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for bulk log files
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not print bulks to stdout
    #[arg(long)]
    pub no_console: bool,

    /// Do not write bulk log files
    #[arg(long)]
    pub no_file: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Accept only a canonical positive decimal integer
pub fn parse_group_size(value: &str) -> Result<usize, CliError> {
    match value.parse::<usize>() {
        Ok(size) if size > 0 && size.to_string() == value => Ok(size),
        _ => Err(CliError::InvalidGroupSize(value.to_string())),
    }
}

impl Cli {
    /// Execute the command
    pub fn execute(&self) -> CliResult<()> {
        self.init_logging()?;
        log::debug!("Arguments: {:?}", self);

        let config = self.resolve_config()?;
        if self.print_config {
            print!("{}", config.to_toml()?);
            return Ok(());
        }

        let size = self.size.ok_or(CliError::MissingGroupSize)?;
        let input = input::open(self.input.as_deref())?;
        runner::run(size, &config, input, io::stdout())
    }

    /// Load the config file, if any, and apply command-line overrides
    pub fn resolve_config(&self) -> CliResult<CliConfig> {
        let mut config = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };

        if let Some(dir) = &self.log_dir {
            config.output.log_dir = dir.clone();
        }
        if self.no_console {
            config.output.console = false;
        }
        if self.no_file {
            config.output.file = false;
        }
        Ok(config)
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> CliResult<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
                .try_init()?;
        }

        Ok(())
    }
}
