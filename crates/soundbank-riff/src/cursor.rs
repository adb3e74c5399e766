//! Little-endian reader for fixed-width records.

use crate::error::{Error, Result};

/// Sequential reader over a record payload.
///
/// Offsets reported in errors are absolute when the cursor is created with
/// [`RecordCursor::at`].
#[derive(Debug, Clone)]
pub struct RecordCursor<'a> {
    data: &'a [u8],
    pos: usize,
    base: usize,
}

impl<'a> RecordCursor<'a> {
    /// Cursor over `data`, reporting offsets relative to its start.
    pub fn new(data: &'a [u8]) -> Self {
        Self::at(data, 0)
    }

    /// Cursor over `data`, which starts at absolute offset `base`.
    pub fn at(data: &'a [u8], base: usize) -> Self {
        Self { data, pos: 0, base }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Current position relative to the start of the cursor.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof {
                offset: self.base + self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    /// Advance past `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    /// Read a fixed-width text field.
    ///
    /// The field always consumes `width` bytes. Text stops at the first NUL
    /// and invalid UTF-8 is replaced rather than rejected.
    pub fn read_fixed_name(&mut self, width: usize) -> Result<String> {
        let raw = self.take(width)?;
        let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }
}
