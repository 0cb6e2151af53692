//! Ordered, append-only relation tables of fixed-arity integer rows.

use serde::{Deserialize, Serialize};

/// A relation table: a flat, ordered sequence of fixed-width `u32` rows.
///
/// Each column is either bound to a named string table (the cell holds a
/// [`StringId`](super::StringId) from that table) or numeric (the cell is a
/// plain value such as a line or column number). The binding is what lets
/// [`Index::merge`](super::Index::merge) rewrite id cells while copying
/// numeric cells verbatim.
///
/// No uniqueness is enforced: the same row may appear any number of times,
/// and row order is exactly append order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Per-column binding: `Some(name)` ties the column to the string table
    /// with that name; `None` marks a numeric column.
    columns: Vec<Option<String>>,
    /// Row-major cell storage; length is always a multiple of the arity.
    cells: Vec<u32>,
}

impl Table {
    pub fn new(columns: Vec<Option<String>>) -> Self {
        assert!(!columns.is_empty(), "table must have at least one column");
        Self {
            columns,
            cells: Vec::new(),
        }
    }

    /// Number of columns per row.
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Per-column string-table bindings.
    pub fn columns(&self) -> &[Option<String>] {
        &self.columns
    }

    /// Appends one row. Panics if the row width does not match the arity.
    pub fn add_row(&mut self, row: &[u32]) {
        assert_eq!(
            row.len(),
            self.arity(),
            "row width {} does not match table arity {}",
            row.len(),
            self.arity()
        );
        self.cells.extend_from_slice(row);
    }

    /// Number of rows appended so far.
    pub fn row_count(&self) -> usize {
        self.cells.len() / self.arity()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The `i`-th row, in append order.
    pub fn row(&self, i: usize) -> &[u32] {
        let arity = self.arity();
        &self.cells[i * arity..(i + 1) * arity]
    }

    /// Iterates rows in append order.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks_exact(self.arity())
    }
}
