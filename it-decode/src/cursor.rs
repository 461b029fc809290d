//! Positional little-endian reads over a byte buffer

use crate::error::ItError;

/// Read-only view over a byte buffer with bounds-checked, offset-addressed reads
///
/// IT headers are laid out at fixed offsets or at offsets computed from other
/// header fields, so every read names its absolute position instead of
/// advancing a stream.
#[derive(Debug, Clone, Copy)]
pub struct ByteReader<'a> {
    data: &'a [u8],
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], ItError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(ItError::OutOfBounds {
                offset,
                len,
                size: self.data.len(),
            })
    }

    fn array_at<const N: usize>(&self, offset: usize) -> Result<[u8; N], ItError> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.bytes_at(offset, N)?);
        Ok(buf)
    }

    /// Read a single byte
    pub fn u8_at(&self, offset: usize) -> Result<u8, ItError> {
        Ok(self.array_at::<1>(offset)?[0])
    }

    /// Read a signed byte
    pub fn i8_at(&self, offset: usize) -> Result<i8, ItError> {
        Ok(i8::from_le_bytes(self.array_at(offset)?))
    }

    /// Read a 16-bit little-endian integer
    pub fn u16_at(&self, offset: usize) -> Result<u16, ItError> {
        Ok(u16::from_le_bytes(self.array_at(offset)?))
    }

    /// Read a signed 16-bit little-endian integer
    pub fn i16_at(&self, offset: usize) -> Result<i16, ItError> {
        Ok(i16::from_le_bytes(self.array_at(offset)?))
    }

    /// Read a 32-bit little-endian integer
    pub fn u32_at(&self, offset: usize) -> Result<u32, ItError> {
        Ok(u32::from_le_bytes(self.array_at(offset)?))
    }

    /// Read a signed 32-bit little-endian integer
    pub fn i32_at(&self, offset: usize) -> Result<i32, ItError> {
        Ok(i32::from_le_bytes(self.array_at(offset)?))
    }
}
