//! Configuration types for the coordinator

/// Maximum accepted line length, in characters
pub const DEFAULT_MAX_LINE_LEN: usize = 50;

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Lines longer than this many characters are rejected
    pub max_line_len: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }
}

impl CoordinatorConfig {
    /// Override the maximum line length
    pub fn max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }
}
