//! Parallel dispatch: one independent indexing task per source file.
//!
//! The tasks share nothing: each builds its own string tables and rows
//! from scratch, so the parallel phase needs no locking. Results are
//! collected by input position, never by completion order; that is what
//! keeps the downstream merge deterministic. The call blocks until every
//! task has finished (fork/join, not a pipeline), and a failing file never
//! cancels its siblings.

use rayon::prelude::*;
use tracing::debug;

use super::file_indexer::{FileIndexOutcome, index_source_file};
use crate::config::SourceFileInfo;

/// Indexes every configured file concurrently.
///
/// The returned vector has the same length and order as `files`.
pub fn index_all(files: &[SourceFileInfo]) -> Vec<FileIndexOutcome> {
    debug!(files = files.len(), "dispatching per-file indexing");
    let outcomes: Vec<_> = files.par_iter().map(index_source_file).collect();
    debug!(
        failed = outcomes.iter().filter(|o| o.diagnostic.is_some()).count(),
        "per-file indexing complete"
    );
    outcomes
}
