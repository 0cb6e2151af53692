//! # xref-base
//!
//! Core library for building a cross-reference index over a collection of
//! source files: for every symbol, every occurrence (declaration,
//! definition, use); for every source location, the symbol sitting there.
//! The frozen index is consumed downstream by navigation tools ("go to
//! definition", "find references").
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! indexer   → per-file indexing, parallel dispatch, deterministic merge
//!   ↓
//! frontend  → lexer, preprocessor, parser, traversable syntax tree
//!   ↓
//! store     → columnar store: string tables, row tables, merge, freeze
//!   ↓
//! config    → source-list configuration (JSON)
//!   ↓
//! base      → primitives (SourceLocation, LineIndex)
//! ```
//!
//! A run is: load a config (an ordered list of files with per-file
//! front-end flags), index every file in parallel, merge the per-file
//! indexes sequentially in input order, freeze the result, and persist it.
//! The final index content is a pure function of the input list order;
//! scheduling and task-completion order never leak into it.

// ============================================================================
// MODULES (dependency order: base → config → store → frontend → indexer)
// ============================================================================

/// Foundation types: SourceLocation, LineIndex
pub mod base;

/// Source-list configuration: SourceFileInfo, JSON loading
pub mod config;

/// Columnar index store: string tables, relation tables, merge, freeze
pub mod store;

/// Front end: logos lexer, include/ifdef preprocessor, parser, syntax tree
pub mod frontend;

/// Indexing pipeline: per-file traversal, parallel dispatch, merge
pub mod indexer;

// Re-export the types most callers need
pub use base::{LineIndex, SourceLocation};
pub use config::{ConfigError, SourceFileInfo, load_config};
pub use frontend::{ParseFailure, SyntaxTree};
pub use indexer::{FileIndexOutcome, index_all, index_source_file, merge_all, new_index, run};
pub use store::{Index, StringId};
