//! Bit-level writer for encoding packed binary data.

use std::ops::{Deref, DerefMut};

use crate::error::{BitError, BitResult};
use crate::MAX_BITS;

/// A bit-level writer for encoding packed binary data.
///
/// Bits are packed most-significant-bit first. Writes are accumulated in an
/// internal buffer; call [`finish`](Self::finish) to get the final bytes.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// The accumulated bytes.
    bytes: Vec<u8>,
    /// Current byte being written (not yet pushed to bytes).
    current_byte: u8,
    /// Number of bits written to `current_byte` (0-7).
    bit_count: u8,
}

impl BitWriter {
    /// Creates a new empty `BitWriter`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new `BitWriter` with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bytes),
            current_byte: 0,
            bit_count: 0,
        }
    }

    /// Returns the number of bits written so far.
    #[must_use]
    pub fn bits_written(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Returns `true` if the cursor sits on a byte boundary.
    #[must_use]
    pub const fn is_aligned(&self) -> bool {
        self.bit_count == 0
    }

    /// Enters bit-packing mode.
    ///
    /// The returned guard derefs to the writer. When it is dropped, on any
    /// exit path, the writer is padded to the next whole byte.
    pub fn bit_region(&mut self) -> WriteRegion<'_> {
        WriteRegion { writer: self }
    }

    /// Writes a single bit.
    pub fn write_bit(&mut self, value: bool) {
        self.current_byte = (self.current_byte << 1) | u8::from(value);
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.flush_byte();
        }
    }

    /// Writes the low `bits` bits of `value`, most significant bit first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits` is not in `1..=32`.
    /// Returns [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`.
    pub fn write_bits(&mut self, value: u32, bits: u8) -> BitResult<()> {
        if bits == 0 || bits > MAX_BITS {
            return Err(BitError::InvalidBitCount {
                bits,
                max_bits: MAX_BITS,
            });
        }
        if bits < MAX_BITS && value >= (1u32 << bits) {
            return Err(BitError::ValueOutOfRange { value, bits });
        }

        let mut remaining = bits;
        while remaining > 0 {
            let free = 8 - self.bit_count;
            let take = free.min(remaining);
            let chunk = (value >> (remaining - take)) & ((1u32 << take) - 1);
            let acc = (u32::from(self.current_byte) << take) | chunk;
            self.current_byte = (acc & 0xFF) as u8;
            self.bit_count += take;
            remaining -= take;
            if self.bit_count == 8 {
                self.flush_byte();
            }
        }
        Ok(())
    }

    /// Pads the current byte with zero bits so the next write is byte-aligned.
    pub fn align_to_byte(&mut self) {
        if self.bit_count > 0 {
            self.current_byte <<= 8 - self.bit_count;
            self.flush_byte();
        }
    }

    /// Writes a byte-aligned `u8`.
    pub fn write_u8_aligned(&mut self, value: u8) -> BitResult<()> {
        self.ensure_aligned()?;
        self.bytes.push(value);
        Ok(())
    }

    /// Writes a byte-aligned `u32` (little-endian).
    pub fn write_u32_aligned(&mut self, value: u32) -> BitResult<()> {
        self.ensure_aligned()?;
        self.bytes.extend_from_slice(&value.to_le_bytes());
        Ok(())
    }

    /// Writes a byte-aligned run of raw bytes.
    pub fn write_bytes_aligned(&mut self, bytes: &[u8]) -> BitResult<()> {
        self.ensure_aligned()?;
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    /// Finishes writing and returns the byte buffer.
    ///
    /// If the last byte is incomplete, it is padded with zeros on the right.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.bytes
    }

    /// Finishes writing and appends to the provided buffer.
    ///
    /// If the last byte is incomplete, it is padded with zeros on the right.
    pub fn finish_into(mut self, buf: &mut Vec<u8>) {
        self.align_to_byte();
        buf.append(&mut self.bytes);
    }

    fn flush_byte(&mut self) {
        self.bytes.push(self.current_byte);
        self.current_byte = 0;
        self.bit_count = 0;
    }

    fn ensure_aligned(&self) -> BitResult<()> {
        if self.bit_count != 0 {
            return Err(BitError::MisalignedAccess {
                bit_position: self.bits_written(),
            });
        }
        Ok(())
    }
}

/// Scoped bit-packing mode over a [`BitWriter`].
///
/// Created by [`BitWriter::bit_region`]. Dropping the region pads the writer
/// to a byte boundary, so aligned writes may resume afterwards.
#[derive(Debug)]
pub struct WriteRegion<'w> {
    writer: &'w mut BitWriter,
}

impl Deref for WriteRegion<'_> {
    type Target = BitWriter;

    fn deref(&self) -> &Self::Target {
        self.writer
    }
}

impl DerefMut for WriteRegion<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.writer
    }
}

impl Drop for WriteRegion<'_> {
    fn drop(&mut self) {
        self.writer.align_to_byte();
    }
}
