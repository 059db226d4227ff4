//! Big-endian primitives shared by blocks and footer records.
//!
//! Every integer on disk is a 4-byte big-endian `u32`; byte strings are
//! written as `[len(4B)][bytes]`.

use crate::error::{Error, Result};

/// Width of every on-disk integer.
pub const U32_SIZE: usize = 4;

/// Narrow a length or offset to its 4-byte field.
pub fn to_u32(n: impl TryInto<u32>, what: &str) -> Result<u32> {
    n.try_into()
        .map_err(|_| Error::TooLarge(what.to_string()))
}

pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Append `[len(4B)][bytes]`.
pub fn put_bytes(buf: &mut Vec<u8>, bytes: &[u8], what: &str) -> Result<()> {
    put_u32(buf, to_u32(bytes.len(), what)?);
    buf.extend_from_slice(bytes);
    Ok(())
}

/// Forward-only cursor over an encoded byte slice.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Decoder { data, pos: 0 }
    }

    pub fn u32(&mut self) -> Result<u32> {
        let raw = self.take(U32_SIZE)?;
        let mut be = [0u8; U32_SIZE];
        be.copy_from_slice(raw);
        Ok(u32::from_be_bytes(be))
    }

    /// Read a `[len(4B)][bytes]` string.
    pub fn bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.u32()? as usize;
        self.take(len)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(Error::Eof)?;
        let out = self.data.get(self.pos..end).ok_or(Error::Eof)?;
        self.pos = end;
        Ok(out)
    }
}
