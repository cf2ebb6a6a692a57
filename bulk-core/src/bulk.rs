//! Bulk buffer and the read-only view handed to sinks

use crate::error::{BulkError, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Ordered group of commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bulk {
    commands: Vec<String>,
}

impl Bulk {
    /// Create an empty bulk
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a command
    pub fn push(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }

    /// Remove all commands
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of buffered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the bulk holds no commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Buffered commands in submission order
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

impl<S: Into<String>> FromIterator<S> for Bulk {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Renders as `bulk: cmd1, cmd2, ...` without a line terminator
impl fmt::Display for Bulk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bulk: {}", self.commands.join(", "))
    }
}

/// Shared handle owned by the coordinator
pub(crate) type SharedBulk = Rc<RefCell<Bulk>>;

/// Non-owning view of a coordinator's bulk.
///
/// The view never keeps the bulk alive; every access checks that the owner
/// still exists and fails with [`BulkError::DeadReference`] otherwise.
#[derive(Debug, Clone, Default)]
pub struct BulkView {
    inner: Weak<RefCell<Bulk>>,
}

impl BulkView {
    /// A view that refers to nothing
    pub fn detached() -> Self {
        Self::default()
    }

    /// Create a view of a shared bulk
    pub fn of(bulk: &Rc<RefCell<Bulk>>) -> Self {
        Self {
            inner: Rc::downgrade(bulk),
        }
    }

    /// Whether the referenced bulk still exists
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Run `f` against the bulk if it is still alive
    pub fn with<R>(&self, f: impl FnOnce(&Bulk) -> R) -> Result<R> {
        let bulk = self.inner.upgrade().ok_or(BulkError::DeadReference)?;
        let bulk = bulk.borrow();
        Ok(f(&bulk))
    }

    /// Number of commands in the referenced bulk
    pub fn len(&self) -> Result<usize> {
        self.with(Bulk::len)
    }

    /// Whether the referenced bulk is empty
    pub fn is_empty(&self) -> Result<bool> {
        self.with(Bulk::is_empty)
    }
}
