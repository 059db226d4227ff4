use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::options::TableOptions;
use crate::sstable::block::BlockBuilder;
use crate::sstable::codec::to_u32;
use crate::sstable::footer::{BlockHandle, IndexEntry, Trailer};
use crate::types::{Item, Key};

/// What `finish` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    /// Data blocks (and footer records) written.
    pub blocks: usize,
    /// Items written across all blocks.
    pub items: u64,
    /// Byte offset of the first footer record.
    pub footer_offset: u32,
    /// Total file size in bytes.
    pub file_size: u64,
}

/// Builds a table file from a sorted stream of key-value pairs.
///
/// Build process:
/// 1. Add items one by one (must be in strictly ascending key order)
/// 2. Items fill the block buffer; once it passes the threshold, the next
///    `add` first writes it out and records a footer entry
/// 3. `finish()` flushes the last block, writes footer records, the trailer,
///    and fsyncs
pub struct TableBuilder {
    /// Current block being filled with items.
    block: BlockBuilder,
    /// Footer records: one per flushed data block.
    index_entries: Vec<IndexEntry>,
    /// Bytes of data blocks written so far.
    data_offset: u64,
    /// Buffered file writer.
    writer: BufWriter<File>,
    /// Last key added; the max key of the current block.
    last_key: Key,
    /// Total items added.
    item_count: u64,
}

impl TableBuilder {
    /// Create a new table builder that writes to the given path.
    /// An existing file at `path` is truncated.
    pub fn new(path: &Path, options: TableOptions) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(TableBuilder {
            block: BlockBuilder::new(options.block_size),
            index_entries: Vec::new(),
            data_offset: 0,
            writer: BufWriter::new(file),
            last_key: Vec::new(),
            item_count: 0,
        })
    }

    /// Add a key-value pair. MUST be called in strictly ascending key order.
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        debug_assert!(
            self.item_count == 0 || key > self.last_key.as_slice(),
            "keys must be added in strictly ascending order"
        );

        // The threshold is checked before adding, so the previous item
        // closes the block it overflowed.
        if self.block.is_full() {
            self.flush_block()?;
        }

        self.block.add(key, value)?;
        self.last_key.clear();
        self.last_key.extend_from_slice(key);
        self.item_count += 1;
        Ok(())
    }

    /// Write the current block to disk and record its footer entry.
    fn flush_block(&mut self) -> Result<()> {
        if self.block.is_empty() {
            return Ok(());
        }

        let handle = BlockHandle {
            offset: to_u32(self.data_offset, "block offset")?,
            len: to_u32(self.block.size(), "block length")?,
            count: self.block.count(),
        };
        self.writer.write_all(self.block.data())?;
        debug!(
            "flushed block {} at offset {}: {} bytes, {} items",
            self.index_entries.len(),
            handle.offset,
            handle.len,
            handle.count
        );

        self.index_entries.push(IndexEntry {
            max_key: self.last_key.clone(),
            handle,
        });
        self.data_offset += u64::from(handle.len);
        self.block.reset();
        Ok(())
    }

    /// Finalize the table: flush the last block, write footer records and
    /// the trailer, fsync.
    pub fn finish(mut self) -> Result<TableSummary> {
        // 1. Flush the last data block
        self.flush_block()?;

        // 2. Footer records, contiguous, in block order
        let footer_offset = to_u32(self.data_offset, "footer offset")?;
        let mut footer = Vec::new();
        for entry in &self.index_entries {
            entry.encode_into(&mut footer)?;
        }
        self.writer.write_all(&footer)?;

        // 3. Trailer: fixed entry point for the reader
        let trailer = Trailer {
            footer_offset,
            footer_count: to_u32(self.index_entries.len(), "footer record count")?,
        };
        self.writer.write_all(&trailer.encode())?;

        // 4. Flush buffer + fsync to guarantee durability
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;

        let file_size = self.data_offset + footer.len() as u64 + Trailer::SIZE as u64;
        info!(
            "finished table: {} items in {} blocks, footer at {}, {} bytes",
            self.item_count,
            self.index_entries.len(),
            footer_offset,
            file_size
        );

        Ok(TableSummary {
            blocks: self.index_entries.len(),
            items: self.item_count,
            footer_offset,
            file_size,
        })
    }
}

/// Write `items` (strictly ascending by key) to a new table at `path` with
/// default options.
pub fn build<P, I>(path: P, items: I) -> Result<TableSummary>
where
    P: AsRef<Path>,
    I: IntoIterator,
    I::Item: Into<Item>,
{
    build_with_options(path, items, &TableOptions::default())
}

/// Like [`build`], with explicit options.
pub fn build_with_options<P, I>(path: P, items: I, options: &TableOptions) -> Result<TableSummary>
where
    P: AsRef<Path>,
    I: IntoIterator,
    I::Item: Into<Item>,
{
    let mut builder = TableBuilder::new(path.as_ref(), *options)?;
    for item in items {
        let item = item.into();
        builder.add(&item.key, &item.value)?;
    }
    builder.finish()
}
