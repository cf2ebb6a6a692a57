//! File sink

use super::naming::{NamingPolicy, TimestampNaming};
use super::Sink;
use crate::bulk::BulkView;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes each bulk to its own file.
///
/// The file name is chosen when a bulk receives its first command; rendering
/// truncates and rewrites that file with `bulk: ...` and no trailing newline.
pub struct FileSink {
    naming: Box<dyn NamingPolicy>,
    view: BulkView,
    path: Option<PathBuf>,
}

impl FileSink {
    /// Write `bulk<secs>.log` files into `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_naming(TimestampNaming::new(dir))
    }

    /// Use a custom naming policy
    pub fn with_naming(naming: impl NamingPolicy + 'static) -> Self {
        Self {
            naming: Box::new(naming),
            view: BulkView::detached(),
            path: None,
        }
    }

    /// Path chosen for the current bulk
    pub fn file_name(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Clock tick used for the current name, for time-based policies
    pub fn timestamp(&self) -> Option<u64> {
        self.naming.timestamp()
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("view", &self.view)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Sink for FileSink {
    fn update(&mut self, view: &BulkView) -> Result<()> {
        if view.len()? == 1 {
            self.path = Some(self.naming.next_name());
        }
        self.view = view.clone();
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let content = self.view.with(|bulk| bulk.to_string())?;
        let path = self
            .path
            .get_or_insert_with(|| self.naming.next_name())
            .clone();
        fs::write(&path, content)?;
        log::debug!("wrote bulk to {}", path.display());
        Ok(())
    }
}
