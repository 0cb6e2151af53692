//! The indexing pipeline.
//!
//! Three phases, in data-flow order:
//!
//! 1. [`index_source_file`] - walk one file's syntax tree into a
//!    self-contained per-file index;
//! 2. [`index_all`] - run phase 1 concurrently over the whole source list,
//!    collecting results in input order;
//! 3. [`merge_all`] / [`run`] - fold the per-file indexes sequentially into
//!    one global index, then freeze it.
//!
//! Every index in the pipeline uses the same schema: string tables `path`,
//! `kind`, `usr`; relation table `ref` with columns
//! `(usr, path, line, column, kind)`, the symbol-to-occurrences relation; and
//! table `loc` with columns `(path, line, column, usr)`, the inverse
//! location-to-symbol relation.

mod dispatcher;
mod file_indexer;
mod merger;

pub use dispatcher::index_all;
pub use file_indexer::{FileIndexOutcome, index_source_file};
pub use merger::{RunError, merge_all, run, run_config_to_file};

use crate::store::Index;

pub const PATH_TABLE: &str = "path";
pub const KIND_TABLE: &str = "kind";
pub const USR_TABLE: &str = "usr";
pub const REF_TABLE: &str = "ref";
pub const LOC_TABLE: &str = "loc";

/// An empty index with the cross-reference schema.
pub fn new_index() -> Index {
    let mut index = Index::new();
    index.add_string_table(PATH_TABLE);
    index.add_string_table(KIND_TABLE);
    index.add_string_table(USR_TABLE);
    index.add_table(
        REF_TABLE,
        vec![
            Some(USR_TABLE.into()),
            Some(PATH_TABLE.into()),
            None, // line
            None, // column
            Some(KIND_TABLE.into()),
        ],
    );
    index.add_table(
        LOC_TABLE,
        vec![
            Some(PATH_TABLE.into()),
            None, // line
            None, // column
            Some(USR_TABLE.into()),
        ],
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_index_schema() {
        let index = new_index();
        assert!(!index.is_frozen());
        assert!(index.is_empty());
        for table in [PATH_TABLE, KIND_TABLE, USR_TABLE] {
            assert!(index.string_table(table).is_some());
        }
        assert_eq!(index.table(REF_TABLE).unwrap().arity(), 5);
        assert_eq!(index.table(LOC_TABLE).unwrap().arity(), 4);
    }
}
