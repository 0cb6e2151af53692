//! Shared fixtures for integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use xref::store::{Index, StringId};
use xref::SourceFileInfo;

/// A temporary directory of source files plus the config entries that
/// point at them.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Writes a file into the project and returns its path.
    pub fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    /// Writes a file and returns a flag-less config entry for it.
    pub fn source(&self, name: &str, contents: &str) -> SourceFileInfo {
        let path = self.file(name, contents);
        SourceFileInfo::with_path(path.display().to_string())
    }
}

/// A `ref` row with its id cells resolved back to strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefRow {
    pub usr: String,
    pub path: String,
    pub line: u32,
    pub column: u32,
    pub kind: String,
}

/// Decodes every `ref` row of an index, in table order.
pub fn ref_rows(index: &Index) -> Vec<RefRow> {
    let usrs = index.string_table("usr").unwrap();
    let paths = index.string_table("path").unwrap();
    let kinds = index.string_table("kind").unwrap();
    index
        .table("ref")
        .unwrap()
        .rows()
        .map(|row| RefRow {
            usr: usrs.get(StringId(row[0])).to_owned(),
            path: paths.get(StringId(row[1])).to_owned(),
            line: row[2],
            column: row[3],
            kind: kinds.get(StringId(row[4])).to_owned(),
        })
        .collect()
}
