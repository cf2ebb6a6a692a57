//! Run loop feeding input lines to the coordinator

use crate::config::CliConfig;
use crate::error::CliResult;
use anyhow::Context;
use bulk_core::{BulkCoordinator, ConsoleSink, CoordinatorConfig, FileSink};
use std::cell::RefCell;
use std::fs;
use std::io::{BufRead, Write};
use std::rc::Rc;

/// Build the sinks described by `config`, feed every line of `input` to a
/// coordinator with group size `size`, and shut it down at end of input.
pub fn run<R, W>(size: usize, config: &CliConfig, input: R, out: W) -> CliResult<()>
where
    R: BufRead,
    W: Write + 'static,
{
    let mut coordinator = BulkCoordinator::with_config(
        CoordinatorConfig::default().max_line_len(config.processing.max_line_length),
    );

    // Sinks must stay alive for the whole run; the coordinator only holds weak handles.
    let console = config
        .output
        .console
        .then(|| Rc::new(RefCell::new(ConsoleSink::new(out))));
    let file = if config.output.file {
        let dir = &config.output.log_dir;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
        Some(Rc::new(RefCell::new(FileSink::new(dir))))
    } else {
        None
    };

    if let Some(console) = &console {
        coordinator.subscribe(console)?;
    }
    if let Some(file) = &file {
        coordinator.subscribe(file)?;
    }
    log::info!(
        "starting with group size {size} and {} sinks",
        coordinator.subscriber_count()
    );

    coordinator.configure(size)?;
    for (index, line) in input.lines().enumerate() {
        let number = index + 1;
        let line = line.with_context(|| format!("Failed to read input line {number}"))?;
        coordinator
            .submit(&line)
            .with_context(|| format!("Failed to process line {number}"))?;
    }
    coordinator.shutdown()?;

    Ok(())
}
