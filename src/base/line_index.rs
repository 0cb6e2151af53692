//! Byte offset to line/column conversion.
//!
//! Built once per file; lookups are a binary search over the precomputed
//! line-start table.

use text_size::TextSize;

/// A 0-based line/column pair. Callers that need 1-based positions (the
/// index stores 1-based lines and columns) add one to each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Maps byte offsets in one file's text to line/column positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Byte offset of the start of each line; `line_starts[0]` is always 0.
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 0-based line/column.
    ///
    /// Offsets past the end of the text resolve onto the last line.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = u32::from(offset) - u32::from(self.line_starts[line]);
        LineCol {
            line: line as u32,
            col,
        }
    }

    /// Number of lines (at least 1, even for empty text).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
