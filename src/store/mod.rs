//! Columnar index store.
//!
//! An [`Index`] is a set of named [`StringTable`]s (append-only string
//! interners with stable integer ids) and named [`Table`]s (ordered,
//! fixed-arity rows of integers). String ids are stable only *within* one
//! index; merging two indexes rewrites every id column through a
//! lookup-or-insert remap.
//!
//! Lifecycle: `Building → Frozen`, one-way. While building, strings can be
//! interned and rows appended; after [`Index::set_read_only`], any write is
//! a programming-contract violation and panics.

mod index;
mod string_table;
mod table;

pub use index::Index;
pub use string_table::{StringId, StringTable};
pub use table::Table;
