//! Core types for the codec.

use wire::{FrameHeader, PixelFormat};

use crate::error::CodecResult;

/// Dimensions and pixel layout of a frame buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameDesc {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel layout.
    pub format: PixelFormat,
}

impl FrameDesc {
    /// Creates a new frame description.
    #[must_use]
    pub const fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// Length of a matching frame buffer: `width * height * bytes_per_pixel`.
    pub fn byte_len(&self) -> CodecResult<usize> {
        Ok(wire::frame_len(self.width, self.height, self.format)?)
    }
}

impl From<&FrameHeader> for FrameDesc {
    fn from(header: &FrameHeader) -> Self {
        Self::new(header.width, header.height, header.format)
    }
}

/// Per-frame counts of how bytes were coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeltaStats {
    /// Bytes stored as plain 8-bit values (raw frames, spatial lead-in).
    pub literal_bytes: usize,
    /// Bytes stored as a 4-bit delta code.
    pub delta_codes: usize,
    /// Bytes stored as escape code plus 8-bit literal.
    pub escapes: usize,
}

impl DeltaStats {
    /// Stats for a frame copied verbatim.
    #[must_use]
    pub const fn raw(len: usize) -> Self {
        Self {
            literal_bytes: len,
            delta_codes: 0,
            escapes: 0,
        }
    }

    /// Number of frame bytes covered.
    #[must_use]
    pub const fn total_bytes(&self) -> usize {
        self.literal_bytes + self.delta_codes + self.escapes
    }

    /// Size of the coded body in bits, before byte alignment.
    #[must_use]
    pub const fn encoded_bits(&self) -> usize {
        self.literal_bytes * 8 + self.delta_codes * 4 + self.escapes * 12
    }
}
