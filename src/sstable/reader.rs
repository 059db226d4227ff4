use std::cell::RefCell;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::{info, trace};

use crate::error::{Error, Result};
use crate::skiplist::SkipList;
use crate::sstable::block::Block;
use crate::sstable::codec::Decoder;
use crate::sstable::footer::{BlockHandle, IndexEntry, Trailer};
use crate::types::Value;

/// An opened table file. Supports point lookups.
///
/// On open:
/// 1. Read the trailer (last 8 bytes) → footer offset and record count
/// 2. Read the footer records into a skip list keyed by each block's max key
/// 3. Ready for queries (data blocks read on demand, never cached)
pub struct Table {
    /// Path to the table file (for debugging/error messages).
    path: PathBuf,
    /// Open file handle for reading data blocks.
    /// Wrapped in RefCell to allow interior mutability for seeking/reading.
    file: RefCell<File>,
    /// Block index: max key → block location.
    index: SkipList<BlockHandle>,
}

impl Table {
    /// Open a table file.
    ///
    /// Reads the trailer from the end of the file, then uses the footer
    /// offset to read every footer record into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;

        let file_size = file.metadata()?.len();
        if file_size < Trailer::SIZE as u64 {
            return Err(Error::Eof);
        }

        // Trailer (last 8 bytes)
        let trailer_offset = file_size - Trailer::SIZE as u64;
        file.seek(SeekFrom::Start(trailer_offset))?;
        let mut trailer_buf = [0u8; Trailer::SIZE];
        file.read_exact(&mut trailer_buf)?;
        let trailer = Trailer::decode(&trailer_buf)?;

        // Footer records sit between the data blocks and the trailer.
        let footer_offset = u64::from(trailer.footer_offset);
        let footer_len = trailer_offset.checked_sub(footer_offset).ok_or(Error::Eof)?;
        file.seek(SeekFrom::Start(footer_offset))?;
        let mut footer_buf = vec![0u8; footer_len as usize];
        file.read_exact(&mut footer_buf)?;

        let mut index = SkipList::new();
        let mut dec = Decoder::new(&footer_buf);
        for _ in 0..trailer.footer_count {
            let entry = IndexEntry::decode(&mut dec)?;
            index.put(entry.max_key, entry.handle);
        }

        info!(
            "loaded table {}: {} blocks, footer at {}",
            path.display(),
            index.len(),
            trailer.footer_offset
        );

        Ok(Table {
            path: path.to_path_buf(),
            file: RefCell::new(file),
            index,
        })
    }

    /// Point lookup: return the value stored under `key`, if any.
    ///
    /// Algorithm:
    /// 1. `first_ge` on the index → the only block whose key range can hold
    ///    `key`; none means every block's max key is smaller
    /// 2. Read exactly that block from disk
    /// 3. Decode it and scan for an exact match
    pub fn get(&self, key: &[u8]) -> Result<Option<Value>> {
        let Some((max_key, &handle)) = self.index.first_ge(key) else {
            trace!("get: key past the last block");
            return Ok(None);
        };
        trace!(
            "get: block with max key {:?} at offset {} ({} bytes)",
            String::from_utf8_lossy(max_key),
            handle.offset,
            handle.len
        );

        let data = self.read_block(handle)?;
        let block = Block::decode(&data, handle.count)?;
        Ok(block.get(key).map(<[u8]>::to_vec))
    }

    fn read_block(&self, handle: BlockHandle) -> Result<Vec<u8>> {
        let mut data = vec![0u8; handle.len as usize];
        let mut file = self.file.borrow_mut();
        file.seek(SeekFrom::Start(u64::from(handle.offset)))?;
        file.read_exact(&mut data)?;
        Ok(data)
    }

    /// Footer records in key order, rebuilt from the in-memory index.
    pub fn index_entries(&self) -> Vec<IndexEntry> {
        self.index
            .iter()
            .map(|(max_key, handle)| IndexEntry {
                max_key: max_key.to_vec(),
                handle: *handle,
            })
            .collect()
    }

    /// Number of data blocks.
    pub fn block_count(&self) -> usize {
        self.index.len()
    }

    /// Path the table was opened from (for debugging/error messages).
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Open the table at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
    Table::open(path.as_ref())
}
