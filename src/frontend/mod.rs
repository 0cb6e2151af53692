//! Source front end for a miniature declaration language.
//!
//! The indexer consumes a narrow contract: given a path and a flattened
//! flag list, produce a traversable [`SyntaxTree`] whose nodes each expose
//! a symbol identifier (USR), an optional referenced declaration, a kind
//! name, and a resolved [`SourceLocation`](crate::base::SourceLocation).
//! This module provides that contract for a small language with functions,
//! variables, types, calls, `include` splicing, and `#ifdef` conditionals:
//!
//! ```text
//! include "defs.x"
//! #ifdef DEBUG
//! var trace_level;
//! #endif
//! fn main {
//!     var local;
//!     init(trace_level);
//!     local;
//! }
//! ```
//!
//! Nodes created from included text carry the *included* file's path and
//! position, the position a navigation tool should jump to rather than the
//! top-level file that pulled the text in.
//!
//! Recognized flags: `-D<name>` defines a conditional symbol, `-I<dir>`
//! adds an include search directory. Anything else is ignored.

mod lexer;
mod parser;
mod preprocess;
mod tree;

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::trace;

pub use lexer::{Lexer, Token, TokenKind};
pub use preprocess::{PToken, SourceFile, TokenStream, preprocess};
pub use tree::{NodeData, NodeId, NodeKind, SyntaxTree, Visit};

/// A front-end failure for one file.
///
/// Non-fatal to a run: the indexer turns it into an empty per-file index
/// plus a diagnostic, and siblings are unaffected.
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// A source or included file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The token stream does not match the grammar.
    #[error("{path}:{line}:{column}: {message}")]
    Syntax {
        path: String,
        line: u32,
        column: u32,
        message: String,
    },

    /// An `include "..."` target was not found in any search directory.
    #[error("{path}: include \"{name}\" not found")]
    IncludeNotFound { path: String, name: String },

    /// A file transitively includes itself.
    #[error("{path}: include cycle through \"{name}\"")]
    IncludeCycle { path: String, name: String },

    /// `#ifdef` without a matching `#endif` at end of file.
    #[error("{path}: unterminated #ifdef")]
    UnterminatedConditional { path: String },
}

/// Parses one file into a traversable syntax tree.
///
/// `args` is the flattened flag list from
/// [`SourceFileInfo::front_end_args`](crate::config::SourceFileInfo::front_end_args).
pub fn parse_file(path: &Path, args: &[String]) -> Result<SyntaxTree, ParseFailure> {
    let mut defines = FxHashSet::default();
    let mut include_dirs: Vec<PathBuf> = Vec::new();
    for arg in args {
        if let Some(name) = arg.strip_prefix("-D") {
            defines.insert(name.to_owned());
        } else if let Some(dir) = arg.strip_prefix("-I") {
            include_dirs.push(PathBuf::from(dir));
        } else {
            trace!(arg, "ignoring unrecognized front-end flag");
        }
    }

    let stream = preprocess(path, &defines, &include_dirs)?;
    parser::parse(&stream)
}
