//! Block-aware batching of command lines
//!
//! Lines are grouped into bulks of a configured size, or into explicitly
//! delimited blocks opened by a `{` line and closed by a `}` line. Each
//! completed bulk is published to every subscribed [`Sink`].
//!
//! ```
//! use bulk_core::{BulkCoordinator, ConsoleSink};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let console = Rc::new(RefCell::new(ConsoleSink::new(Vec::new())));
//! let mut coordinator = BulkCoordinator::new();
//! coordinator.subscribe(&console).unwrap();
//! coordinator.configure(2).unwrap();
//!
//! for line in ["cmd1", "cmd2", "cmd3"] {
//!     coordinator.submit(line).unwrap();
//! }
//! coordinator.shutdown().unwrap();
//!
//! let output = String::from_utf8(console.borrow().get_ref().clone()).unwrap();
//! assert_eq!(output, "bulk: cmd1, cmd2\nbulk: cmd3\n");
//! ```

#![warn(missing_docs)]

pub mod bulk;
pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod sink;

pub use bulk::{Bulk, BulkView};
pub use classifier::{LineClassifier, LineKind};
pub use config::CoordinatorConfig;
pub use coordinator::{BulkCoordinator, GroupSize};
pub use error::{BulkError, Result};
pub use sink::{
    Clock, ConsoleSink, FileSink, FixedNaming, NamingPolicy, Sink, SystemClock, TimestampNaming,
};
