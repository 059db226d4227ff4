use crate::error::Result;
use crate::sstable::codec::{put_bytes, to_u32};

/// Accumulates sorted key-value pairs into one data block.
///
/// On-disk layout of a block (no header, no trailer):
/// ```text
/// ┌────────────────────────────────────────────────────┐
/// │ Item 0: [key_len(4B)][key][value_len(4B)][value]   │
/// │ Item 1: ...                                        │
/// │ Item N: ...                                        │
/// └────────────────────────────────────────────────────┘
/// ```
///
/// The item count lives in the footer record, not in the block.
///
/// `block_size` is a soft cap: `add` always accepts, and the table builder
/// asks `is_full` *before* the next item. A block therefore overshoots by at
/// most one encoded item.
pub struct BlockBuilder {
    data: Vec<u8>,
    count: u32,
    block_size: usize,
}

impl BlockBuilder {
    /// Create a new block builder with target block size.
    pub fn new(block_size: usize) -> Self {
        BlockBuilder {
            data: Vec::new(),
            count: 0,
            block_size,
        }
    }

    /// Append an item. Items MUST be added in sorted key order.
    pub fn add(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let count = to_u32(self.count as u64 + 1, "block item count")?;
        put_bytes(&mut self.data, key, "key length")?;
        put_bytes(&mut self.data, value, "value length")?;
        self.count = count;
        Ok(())
    }

    /// Whether the buffered bytes have passed the threshold.
    pub fn is_full(&self) -> bool {
        self.data.len() > self.block_size
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Items buffered in this block.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Encoded bytes buffered so far.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Start a new block, keeping the buffer's allocation.
    pub fn reset(&mut self) {
        self.data.clear();
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_is_empty() {
        let builder = BlockBuilder::new(4096);
        assert!(builder.is_empty());
        assert!(!builder.is_full());
        assert_eq!(builder.size(), 0);
    }

    #[test]
    fn item_layout_is_length_prefixed() {
        let mut builder = BlockBuilder::new(4096);
        builder.add(b"key1", b"value1").unwrap();
        assert_eq!(builder.count(), 1);
        // 4 + 4 + 4 + 6
        assert_eq!(builder.size(), 18);
        assert_eq!(
            builder.data(),
            b"\x00\x00\x00\x04key1\x00\x00\x00\x06value1".as_slice()
        );
    }

    #[test]
    fn full_only_after_passing_threshold() {
        let mut builder = BlockBuilder::new(20);
        builder.add(b"aa", b"bbbbbbbbbbbb").unwrap(); // 22 bytes
        assert!(builder.is_full());

        let mut builder = BlockBuilder::new(22);
        builder.add(b"aa", b"bbbbbbbbbbbb").unwrap();
        // Exactly at the threshold is not over it.
        assert!(!builder.is_full());
    }

    #[test]
    fn oversized_item_is_still_accepted() {
        let mut builder = BlockBuilder::new(8);
        builder.add(b"key", &[7u8; 100]).unwrap();
        assert_eq!(builder.count(), 1);
        assert!(builder.is_full());
    }

    #[test]
    fn reset_clears_items() {
        let mut builder = BlockBuilder::new(4096);
        builder.add(b"a", b"1").unwrap();
        builder.add(b"b", b"2").unwrap();
        builder.reset();
        assert!(builder.is_empty());
        assert_eq!(builder.size(), 0);
    }
}
