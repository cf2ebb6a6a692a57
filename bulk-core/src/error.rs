//! Error types for bulk processing

use thiserror::Error;

/// Errors raised by the coordinator and its sinks
#[derive(Error, Debug)]
pub enum BulkError {
    /// Group size set below the number of buffered commands (or to zero)
    #[error("invalid group size {requested}: {buffered} commands already buffered")]
    InvalidConfiguration {
        /// The rejected group size
        requested: usize,
        /// Commands in the bulk at the time of the request
        buffered: usize,
    },

    /// A line was submitted before any group size was configured
    #[error("group size is not configured")]
    NotConfigured,

    /// Submitted line exceeds the maximum length
    #[error("line too long: {len} characters (max {max})")]
    LineTooLong {
        /// Length of the rejected line in characters
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// A block was closed with nothing buffered
    #[error("cannot close an empty block")]
    EmptyBlockClose,

    /// A sink was asked to render without a live bulk
    #[error("bulk does not exist")]
    DeadReference,

    /// Sink output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bulk operations
pub type Result<T> = std::result::Result<T, BulkError>;
