//! Sorted-string table format.
//!
//! ```text
//! file         := data_block* footer_entry* footer_offset(4B) footer_count(4B)
//! data_block   := item*
//! item         := key_len(4B) key value_len(4B) value
//! footer_entry := key_len(4B) key block_offset(4B) block_len(4B) item_count(4B)
//! ```
//!
//! All integers are big-endian. Data blocks come first, in key order, with
//! no padding between them.

pub mod block;
pub mod builder;
pub mod codec;
pub mod footer;
pub mod reader;

pub use builder::{build, build_with_options, TableBuilder, TableSummary};
pub use footer::{BlockHandle, IndexEntry};
pub use reader::{load, Table};
