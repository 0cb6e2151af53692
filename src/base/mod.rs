//! Foundation types for the xref toolchain.
//!
//! - [`SourceLocation`] - resolved (path, line, column) positions
//! - [`LineIndex`] - byte offset to line/column conversion
//!
//! This module has NO dependencies on other xref modules.

mod line_index;
mod location;

pub use line_index::{LineCol, LineIndex};
pub use location::SourceLocation;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
