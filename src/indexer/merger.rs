//! Sequential merge of per-file indexes into one global index, and the
//! whole-run orchestration around it.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use super::dispatcher::index_all;
use super::new_index;
use crate::config::{ConfigError, SourceFileInfo, load_config};
use crate::frontend::ParseFailure;
use crate::store::Index;

/// A whole-run failure. Per-file parse failures are *not* errors at this
/// level; they surface as diagnostics while the run continues.
#[derive(Debug, Error)]
pub enum RunError {
    /// The configuration could not be loaded; fatal, no partial recovery.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The final artifact could not be written.
    #[error("cannot write index artifact: {0}")]
    Save(#[from] std::io::Error),
}

/// Folds `parts` into `global`, strictly in slice order.
///
/// The merge phase is the only place multiple indexes touch, and the global
/// index has exactly one writer, so this stays single-threaded. Row order in
/// the global tables afterwards is part 0's rows, then part 1's, and so on.
pub fn merge_all(global: &mut Index, parts: &[Index]) {
    for part in parts {
        global.merge(part);
    }
    debug!(parts = parts.len(), "per-file indexes merged");
}

/// Runs the full pipeline over an ordered source list: parallel per-file
/// indexing, in-order merge, freeze.
///
/// The returned index is frozen and safe for concurrent read-only use. Its
/// content is a pure function of `files` and the files' text, so scheduling
/// order cannot affect it. Diagnostics come back in input order.
pub fn run(files: &[SourceFileInfo]) -> (Index, Vec<ParseFailure>) {
    let outcomes = index_all(files);

    let mut global = new_index();
    let mut diagnostics = Vec::new();
    for outcome in outcomes {
        global.merge(&outcome.index);
        diagnostics.extend(outcome.diagnostic);
    }
    global.set_read_only();
    debug!(
        files = files.len(),
        failed = diagnostics.len(),
        "global index frozen"
    );
    (global, diagnostics)
}

/// The process boundary: one config in, one persisted artifact out.
///
/// Configuration errors abort the run; per-file failures are returned as
/// diagnostics for the caller to report on its error stream.
pub fn run_config_to_file(
    config_path: impl AsRef<Path>,
    out_path: impl AsRef<Path>,
) -> Result<Vec<ParseFailure>, RunError> {
    let files = load_config(config_path)?;
    let (index, diagnostics) = run(&files);
    index.save(out_path)?;
    Ok(diagnostics)
}
