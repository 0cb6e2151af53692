//! Per-file indexing: one syntax tree in, one self-contained index out.

use std::path::Path;

use tracing::{trace, warn};

use super::{KIND_TABLE, LOC_TABLE, PATH_TABLE, REF_TABLE, USR_TABLE, new_index};
use crate::config::SourceFileInfo;
use crate::frontend::{self, NodeId, ParseFailure, SyntaxTree, Visit};
use crate::store::Index;

/// The result of indexing one file.
///
/// A front-end failure is not propagated: the outcome then carries a valid
/// empty index plus the failure as a diagnostic, and the run continues.
#[derive(Debug)]
pub struct FileIndexOutcome {
    pub index: Index,
    pub diagnostic: Option<ParseFailure>,
}

/// Indexes one source file into a self-contained per-file index.
///
/// Never fails past its own boundary. On success the returned index is
/// already frozen: it is write-once, built fully and then handed off.
pub fn index_source_file(sfi: &SourceFileInfo) -> FileIndexOutcome {
    let args = sfi.front_end_args();
    let tree = match frontend::parse_file(Path::new(&sfi.file), &args) {
        Ok(tree) => tree,
        Err(failure) => {
            warn!(
                file = %sfi.file,
                args = ?args,
                error = %failure,
                "front end failed, contributing an empty index"
            );
            return FileIndexOutcome {
                index: new_index(),
                diagnostic: Some(failure),
            };
        }
    };

    let mut index = new_index();
    tree.walk(|tree, id| {
        record_node(&mut index, tree, id);
        // Never stop early: a skipped node's children may still be indexed.
        Visit::Children
    });
    index.set_read_only();

    trace!(
        file = %sfi.file,
        rows = index.table(REF_TABLE).map_or(0, |t| t.row_count()),
        "file indexed"
    );
    FileIndexOutcome {
        index,
        diagnostic: None,
    }
}

/// Records one visited node, or nothing if it carries no identifier.
fn record_node(index: &mut Index, tree: &SyntaxTree, id: NodeId) {
    // Use-site resolution happens here: a node that refers to a declaration
    // is indexed under the declaration's identifier. Empty means the node
    // names no symbol (most syntactic nodes) and is not indexed.
    let usr = tree.effective_usr(id);
    if usr.is_empty() {
        return;
    }

    let node = tree.node(id);
    let usr_id = index.intern(USR_TABLE, usr);
    let path_id = index.intern(PATH_TABLE, &node.loc.path);
    let kind_id = index.intern(KIND_TABLE, node.kind.name());

    // Two projections of the same event, appended together: every ref row
    // has its loc counterpart at the same ordinal position.
    index.add_row(
        REF_TABLE,
        &[
            usr_id.raw(),
            path_id.raw(),
            node.loc.line,
            node.loc.column,
            kind_id.raw(),
        ],
    );
    index.add_row(
        LOC_TABLE,
        &[path_id.raw(), node.loc.line, node.loc.column, usr_id.raw()],
    );
}
