//! Bit-level reader with bounded operations.

use std::ops::{Deref, DerefMut};

use crate::error::{BitError, BitResult};
use crate::MAX_BITS;

/// A bit-level reader for decoding packed binary data.
///
/// All read operations are bounds-checked and return errors on failure.
/// The reader never panics on malformed input, and a failed read leaves the
/// cursor where it was.
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` from a byte slice.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Returns the number of bits remaining to read.
    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        self.data
            .len()
            .saturating_mul(8)
            .saturating_sub(self.bit_pos)
    }

    /// Returns `true` if there are no more bits to read.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Returns the current bit position.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.bit_pos
    }

    /// Enters bit-unpacking mode.
    ///
    /// When the returned guard is dropped the cursor is rounded up to the
    /// next whole byte, mirroring [`BitWriter::bit_region`](crate::BitWriter::bit_region).
    pub fn bit_region(&mut self) -> ReadRegion<'_, 'a> {
        ReadRegion { reader: self }
    }

    /// Reads a single bit as a boolean.
    pub fn read_bit(&mut self) -> BitResult<bool> {
        self.ensure_bits(1)?;
        let byte_idx = self.bit_pos / 8;
        let bit_idx = self.bit_pos % 8;
        let bit = (self.data[byte_idx] >> (7 - bit_idx)) & 1;
        self.bit_pos += 1;
        Ok(bit == 1)
    }

    /// Reads `bits` bits (1 to 32) as an unsigned integer.
    pub fn read_bits(&mut self, bits: u8) -> BitResult<u32> {
        if bits == 0 || bits > MAX_BITS {
            return Err(BitError::InvalidBitCount {
                bits,
                max_bits: MAX_BITS,
            });
        }
        self.ensure_bits(bits as usize)?;

        let mut value = 0u32;
        let mut remaining = bits as usize;
        while remaining > 0 {
            let byte = u32::from(self.data[self.bit_pos / 8]);
            let avail = 8 - self.bit_pos % 8;
            let take = avail.min(remaining);
            let chunk = (byte >> (avail - take)) & ((1u32 << take) - 1);
            value = (value << take) | chunk;
            self.bit_pos += take;
            remaining -= take;
        }
        Ok(value)
    }

    /// Aligns to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        let rem = self.bit_pos % 8;
        if rem != 0 {
            // The containing byte exists, so this never passes the end.
            self.bit_pos += 8 - rem;
        }
    }

    /// Reads a byte-aligned `u8`.
    pub fn read_u8_aligned(&mut self) -> BitResult<u8> {
        let [value] = self.read_aligned_array::<1>()?;
        Ok(value)
    }

    /// Reads a byte-aligned `u32` (little-endian).
    pub fn read_u32_aligned(&mut self) -> BitResult<u32> {
        let bytes = self.read_aligned_array::<4>()?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Reads `len` byte-aligned bytes, borrowing them from the input.
    pub fn read_bytes_aligned(&mut self, len: usize) -> BitResult<&'a [u8]> {
        self.ensure_aligned()?;
        self.ensure_bits(len.saturating_mul(8))?;
        let idx = self.bit_pos / 8;
        let out = &self.data[idx..idx + len];
        self.bit_pos += len * 8;
        Ok(out)
    }

    fn ensure_aligned(&self) -> BitResult<()> {
        if self.bit_pos % 8 != 0 {
            return Err(BitError::MisalignedAccess {
                bit_position: self.bit_pos,
            });
        }
        Ok(())
    }

    fn ensure_bits(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::UnexpectedEof {
                requested: bits,
                available,
            });
        }
        Ok(())
    }

    fn read_aligned_array<const N: usize>(&mut self) -> BitResult<[u8; N]> {
        let slice = self.read_bytes_aligned(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Ok(out)
    }
}

/// Scoped bit-unpacking mode over a [`BitReader`].
///
/// Created by [`BitReader::bit_region`]. Dropping the region skips the
/// padding bits of the final partial byte.
#[derive(Debug)]
pub struct ReadRegion<'r, 'a> {
    reader: &'r mut BitReader<'a>,
}

impl<'a> Deref for ReadRegion<'_, 'a> {
    type Target = BitReader<'a>;

    fn deref(&self) -> &Self::Target {
        self.reader
    }
}

impl DerefMut for ReadRegion<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.reader
    }
}

impl Drop for ReadRegion<'_, '_> {
    fn drop(&mut self) {
        self.reader.align_to_byte();
    }
}
