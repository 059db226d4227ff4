use crate::error::{Error, Result};
use crate::sstable::codec::{put_bytes, put_u32, Decoder, U32_SIZE};
use crate::types::Key;

/// Where a data block lives in the file and how many items it holds.
///
/// This is the value the table's in-memory index stores per block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHandle {
    /// Byte offset of the block from the start of the file.
    pub offset: u32,
    /// Encoded length of the block in bytes.
    pub len: u32,
    /// Number of items in the block.
    pub count: u32,
}

/// One footer record per data block.
/// Maps a block's largest key to its location in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Last (largest) key in the block.
    pub max_key: Key,
    pub handle: BlockHandle,
}

impl IndexEntry {
    /// Append this record.
    /// Format: [key_len(4B)][key][offset(4B)][len(4B)][count(4B)]
    pub fn encode_into(&self, buf: &mut Vec<u8>) -> Result<()> {
        put_bytes(buf, &self.max_key, "index key length")?;
        put_u32(buf, self.handle.offset);
        put_u32(buf, self.handle.len);
        put_u32(buf, self.handle.count);
        Ok(())
    }

    /// Decode the next record from `dec`.
    pub fn decode(dec: &mut Decoder<'_>) -> Result<Self> {
        let max_key = dec.bytes()?.to_vec();
        let offset = dec.u32()?;
        let len = dec.u32()?;
        let count = dec.u32()?;
        Ok(IndexEntry {
            max_key,
            handle: BlockHandle { offset, len, count },
        })
    }
}

/// The fixed-size trailer: always the last 8 bytes of the file.
///
/// ```text
/// ┌──────────────────────────────────────┐
/// │ Footer start offset (4B)             │
/// │ Footer record count (4B)             │
/// └──────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub footer_offset: u32,
    pub footer_count: u32,
}

impl Trailer {
    /// Size of the trailer in bytes (fixed).
    pub const SIZE: usize = 2 * U32_SIZE;

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[..U32_SIZE].copy_from_slice(&self.footer_offset.to_be_bytes());
        buf[U32_SIZE..].copy_from_slice(&self.footer_count.to_be_bytes());
        buf
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(Error::Eof);
        }
        let mut dec = Decoder::new(data);
        Ok(Trailer {
            footer_offset: dec.u32()?,
            footer_count: dec.u32()?,
        })
    }
}
