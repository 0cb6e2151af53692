//! Resolved source positions.
//!
//! A [`SourceLocation`] is where a syntax-tree node "really" sits: the path
//! of the file that physically contains the text (which may be an included
//! file rather than the top-level one), plus 1-based line and column.

use std::fmt;

/// A resolved position in source code (1-based line and column).
///
/// The column counts bytes from the start of the line. The path may be the
/// empty string when the front end could not attribute the node to a file;
/// downstream consumers treat the empty string as a sentinel, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub path: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(path: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}
