//! Append-only string interner with stable integer ids.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A stable id for a string within one string table.
///
/// Ids are dense: the first interned string gets id 0, the next id 1, and
/// so on. They are meaningful only relative to the table that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StringId(pub u32);

impl StringId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// String table: deduplicating, append-only.
///
/// Interning the same string twice returns the same id. Strings are kept in
/// insertion order, so iteration and serialization are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StringTable {
    /// Strings in id order.
    strings: Vec<String>,
    /// Lookup side; rebuilt from `strings` after deserialization.
    #[serde(skip)]
    lookup: FxHashMap<String, StringId>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a string, returning its stable id.
    ///
    /// Returns the existing id if the string was seen before.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.lookup.get(s) {
            return id;
        }
        let id = StringId(self.strings.len() as u32);
        self.strings.push(s.to_owned());
        self.lookup.insert(s.to_owned(), id);
        id
    }

    /// Looks up an id without interning.
    pub fn id_of(&self, s: &str) -> Option<StringId> {
        self.lookup.get(s).copied()
    }

    /// The string behind an id. Panics on an id this table never issued.
    pub fn get(&self, id: StringId) -> &str {
        &self.strings[id.0 as usize]
    }

    /// Number of distinct strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterates strings in id order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }

    /// Rebuilds the lookup map from the id-ordered string list.
    ///
    /// Called once after deserialization, since the lookup side is skipped
    /// by serde.
    pub(crate) fn rebuild_lookup(&mut self) {
        self.lookup = self
            .strings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), StringId(i as u32)))
            .collect();
    }
}
