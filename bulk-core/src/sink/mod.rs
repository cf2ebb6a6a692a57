//! Output sinks for completed bulks

use crate::bulk::BulkView;
use crate::error::Result;

pub mod console;
pub mod file;
pub mod naming;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use naming::{Clock, FixedNaming, NamingPolicy, SystemClock, TimestampNaming};

/// Consumer of bulks published by a [`BulkCoordinator`](crate::BulkCoordinator)
pub trait Sink {
    /// Receive the current view of the bulk.
    ///
    /// Called on subscription and after every command appended to the bulk.
    fn update(&mut self, view: &BulkView) -> Result<()>;

    /// Render the bulk last handed to [`Sink::update`]
    fn render(&mut self) -> Result<()>;
}
