//! Console sink

use super::Sink;
use crate::bulk::BulkView;
use crate::error::Result;
use std::io::{self, Write};

/// Writes each bulk as one `bulk: ...` line
pub struct ConsoleSink<W: Write> {
    writer: W,
    view: BulkView,
}

impl<W: Write> ConsoleSink<W> {
    /// Create a console sink over any writer
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            view: BulkView::detached(),
        }
    }

    /// Borrow the underlying writer
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consume the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl ConsoleSink<io::Stdout> {
    /// Create a sink that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Sink for ConsoleSink<W> {
    fn update(&mut self, view: &BulkView) -> Result<()> {
        self.view = view.clone();
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let line = self.view.with(|bulk| bulk.to_string())?;
        writeln!(self.writer, "{line}")?;
        self.writer.flush()?;
        Ok(())
    }
}
