use crate::error::Result;
use crate::sstable::codec::{Decoder, U32_SIZE};
use crate::types::Item;

/// A decoded data block.
///
/// Blocks carry no offset array, so lookups are a linear scan over the
/// decoded items. Blocks are small (a few KB), which keeps this cheap.
#[derive(Debug)]
pub struct Block {
    items: Vec<Item>,
}

impl Block {
    /// Decode `count` items from raw block bytes, as recorded in the block's
    /// footer record.
    pub fn decode(data: &[u8], count: u32) -> Result<Self> {
        let mut dec = Decoder::new(data);
        // Every item carries two length prefixes; the count alone is not
        // trusted for sizing.
        let max_items = data.len() / (2 * U32_SIZE);
        let mut items = Vec::with_capacity((count as usize).min(max_items));
        for _ in 0..count {
            let key = dec.bytes()?.to_vec();
            let value = dec.bytes()?.to_vec();
            items.push(Item { key, value });
        }
        Ok(Block { items })
    }

    /// Exact-match lookup.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.as_slice())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
