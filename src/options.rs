/// Default soft cap for a data block, in bytes.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Knobs for writing a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    /// Soft block-size threshold. A block is closed once its buffered bytes
    /// exceed this, checked before the next item is added, so a block may
    /// overshoot by at most one encoded item.
    pub block_size: usize,
}

impl TableOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}
