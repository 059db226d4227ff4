//! # Sorted Table
//!
//! An immutable sorted-string table (SSTable) with a skip-list block index.
//!
//! ## Core idea
//! A single writer packs strictly ascending key/value pairs into
//! size-bounded data blocks, then appends one footer record per block
//! (the block's largest key and its location). A reader loads only the
//! footer into an in-memory [`SkipList`], and answers a lookup by finding
//! the first block whose max key is `>=` the target, reading just that
//! block, and scanning it.
//!
//! ```no_run
//! # fn main() -> sorted_table::Result<()> {
//! sorted_table::build("/tmp/t.sst", [("a", "1"), ("b", "2"), ("m", "3")])?;
//! let table = sorted_table::load("/tmp/t.sst")?;
//! assert_eq!(table.get(b"b")?, Some(b"2".to_vec()));
//! assert_eq!(table.get(b"z")?, None);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod options;
pub mod skiplist;
pub mod sstable;
pub mod types;

// Public re-exports for the top-level API
pub use error::{Error, Result};
pub use options::TableOptions;
pub use skiplist::SkipList;
pub use sstable::{build, build_with_options, load, Table, TableBuilder, TableSummary};
pub use types::{Item, Key, Value};
