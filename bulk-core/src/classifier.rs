//! Line classification for block-aware batching

/// Marker line that opens a block
pub const BLOCK_OPEN: &str = "{";

/// Marker line that closes a block
pub const BLOCK_CLOSE: &str = "}";

/// Classification of an input line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind {
    /// Ordinary command, including the empty line
    Command,
    /// Outer block opened (depth 0 -> 1)
    StartBlock,
    /// Outer block closed (depth 1 -> 0)
    CancelBlock,
    /// Marker that does not cross the outer block boundary
    Nested,
}

/// Stateful classifier tracking block nesting depth.
///
/// A line is a marker only when it is exactly `{` or `}`; no trimming is
/// applied, so `" {"` or `"{cmd"` are commands.
#[derive(Debug, Default, Clone)]
pub struct LineClassifier {
    depth: usize,
}

impl LineClassifier {
    /// Create a classifier at depth 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Classify a line, updating the nesting depth
    pub fn classify(&mut self, line: &str) -> LineKind {
        match line {
            BLOCK_OPEN => {
                self.depth += 1;
                if self.depth == 1 {
                    LineKind::StartBlock
                } else {
                    LineKind::Nested
                }
            }
            BLOCK_CLOSE => match self.depth {
                0 => LineKind::Nested,
                1 => {
                    self.depth = 0;
                    LineKind::CancelBlock
                }
                _ => {
                    self.depth -= 1;
                    LineKind::Nested
                }
            },
            _ => LineKind::Command,
        }
    }
}
