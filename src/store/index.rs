//! The index: named string tables + named relation tables, with merge,
//! one-way freeze, and snapshot persistence.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{StringId, StringTable, Table};

/// A self-contained index: named string tables plus named relation tables.
///
/// Lifecycle is `Building → Frozen`, one-way. All writes (interning,
/// appending, merging into) require the Building state; a write attempted
/// while frozen is a contract violation and panics. Reading, including
/// being merged *from*, is always allowed.
///
/// Tables are kept in registration order (insertion-ordered maps), so two
/// indexes built through the same sequence of operations serialize to
/// identical snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    string_tables: IndexMap<String, StringTable>,
    tables: IndexMap<String, Table>,
    frozen: bool,
}

impl Index {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Schema setup
    // ------------------------------------------------------------------

    /// Registers an empty string table under `name`.
    pub fn add_string_table(&mut self, name: impl Into<String>) {
        self.assert_writable();
        let name = name.into();
        let previous = self.string_tables.insert(name.clone(), StringTable::new());
        assert!(previous.is_none(), "duplicate string table {name:?}");
    }

    /// Registers an empty relation table under `name`.
    ///
    /// Every `Some(table_name)` column must refer to an already-registered
    /// string table.
    pub fn add_table(&mut self, name: impl Into<String>, columns: Vec<Option<String>>) {
        self.assert_writable();
        let name = name.into();
        for column in columns.iter().flatten() {
            assert!(
                self.string_tables.contains_key(column),
                "table {name:?} binds column to unknown string table {column:?}"
            );
        }
        let previous = self.tables.insert(name.clone(), Table::new(columns));
        assert!(previous.is_none(), "duplicate table {name:?}");
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn string_table(&self, name: &str) -> Option<&StringTable> {
        self.string_tables.get(name)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// True when every table (string and relation) is empty.
    pub fn is_empty(&self) -> bool {
        self.string_tables.values().all(StringTable::is_empty)
            && self.tables.values().all(Table::is_empty)
    }

    // ------------------------------------------------------------------
    // Writes (Building state only)
    // ------------------------------------------------------------------

    /// Interns `s` into the string table named `table`.
    ///
    /// Panics if the index is frozen or the table does not exist; both are
    /// programming errors, not runtime conditions.
    pub fn intern(&mut self, table: &str, s: &str) -> StringId {
        self.assert_writable();
        self.string_tables
            .get_mut(table)
            .unwrap_or_else(|| panic!("no string table {table:?}"))
            .intern(s)
    }

    /// Appends a row to the relation table named `table`.
    ///
    /// Panics if the index is frozen, the table does not exist, or the row
    /// width does not match the table's arity.
    pub fn add_row(&mut self, table: &str, row: &[u32]) {
        self.assert_writable();
        self.tables
            .get_mut(table)
            .unwrap_or_else(|| panic!("no table {table:?}"))
            .add_row(row);
    }

    /// Folds `other` into this index.
    ///
    /// Every string of every string table in `other` is looked up or
    /// inserted into the same-named table here, producing an id remap; every
    /// row of every relation table is then appended with id cells rewritten
    /// through the remap of the column's string table and numeric cells
    /// copied verbatim. `other`'s rows land after all existing rows, in
    /// `other`'s order.
    ///
    /// The two indexes must share a schema (same table names, same column
    /// bindings); a mismatch is a contract violation and panics. `other` is
    /// only read and may itself be frozen.
    pub fn merge(&mut self, other: &Index) {
        self.assert_writable();

        // String tables first: per-table id remap, other's id -> ours.
        let mut remaps: FxHashMap<&str, Vec<StringId>> = FxHashMap::default();
        for (name, theirs) in &other.string_tables {
            let ours = self
                .string_tables
                .get_mut(name)
                .unwrap_or_else(|| panic!("merge: no string table {name:?} on this side"));
            let remap = theirs.iter().map(|s| ours.intern(s)).collect();
            remaps.insert(name.as_str(), remap);
        }

        // Then rows, rewritten through the remaps.
        for (name, theirs) in &other.tables {
            let ours = self
                .tables
                .get_mut(name)
                .unwrap_or_else(|| panic!("merge: no table {name:?} on this side"));
            assert_eq!(
                ours.columns(),
                theirs.columns(),
                "merge: column bindings of table {name:?} differ"
            );
            let mut row = vec![0u32; theirs.arity()];
            for their_row in theirs.rows() {
                for (cell, (value, column)) in
                    row.iter_mut().zip(their_row.iter().zip(theirs.columns()))
                {
                    *cell = match column {
                        Some(table) => remaps[table.as_str()][*value as usize].raw(),
                        None => *value,
                    };
                }
                ours.add_row(&row);
            }
        }
    }

    /// Transitions the index to the Frozen state. One-way and terminal:
    /// every subsequent write panics.
    pub fn set_read_only(&mut self) {
        self.frozen = true;
    }

    fn assert_writable(&self) {
        assert!(!self.frozen, "write attempted on a frozen index");
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Writes a snapshot of the whole index to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = File::create(path.as_ref())?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        debug!(path = %path.as_ref().display(), "index saved");
        Ok(())
    }

    /// Restores an index from a snapshot written by [`Index::save`].
    pub fn load(path: impl AsRef<Path>) -> io::Result<Index> {
        let file = File::open(path.as_ref())?;
        let mut index: Index = serde_json::from_reader(BufReader::new(file))?;
        for table in index.string_tables.values_mut() {
            table.rebuild_lookup();
        }
        Ok(index)
    }
}
