//! Input line sources

use crate::error::{CliError, CliResult};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Open the input as a buffered line reader.
///
/// Reads from `path` when given, stdin otherwise.
pub fn open(path: Option<&Path>) -> CliResult<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                CliError::InputError(format!("Failed to open {}: {e}", path.display()))
            })?;
            log::debug!("reading commands from {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}
