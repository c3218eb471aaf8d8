//! Frame header layout.

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::format::{Encoding, PixelFormat};
use crate::limits::Limits;

/// Header size in bytes (17 total).
pub const HEADER_SIZE: usize = 4 + 1 + 4 + 4 + 4;

/// Frame header.
///
/// Fields are always written in this order with fixed widths, whatever the
/// encoding. See `WIRE_FORMAT.md` for the byte layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameHeader {
    /// Payload encoding.
    pub encoding: Encoding,
    /// Whether the payload section is zlib-compressed.
    pub compressed: bool,
    /// Pixel layout.
    pub format: PixelFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameHeader {
    /// Creates a new header.
    #[must_use]
    pub const fn new(
        encoding: Encoding,
        compressed: bool,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            encoding,
            compressed,
            format,
            width,
            height,
        }
    }

    /// Size of the decoded frame buffer in bytes.
    pub fn frame_len(&self) -> WireResult<usize> {
        frame_len(self.width, self.height, self.format)
    }
}

/// Computes `width * height * bytes_per_pixel` with overflow checking.
pub fn frame_len(width: u32, height: u32, format: PixelFormat) -> WireResult<usize> {
    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
        .ok_or(DecodeError::FrameSizeOverflow { width, height })
}

/// Encodes a frame header into the provided output buffer.
pub fn encode_header(header: &FrameHeader, out: &mut [u8]) -> Result<usize, EncodeError> {
    if out.len() < HEADER_SIZE {
        return Err(EncodeError::BufferTooSmall {
            needed: HEADER_SIZE,
            available: out.len(),
        });
    }

    out[0..4].copy_from_slice(&header.encoding.tag().to_le_bytes());
    out[4] = u8::from(header.compressed);
    out[5..9].copy_from_slice(&header.format.tag().to_le_bytes());
    out[9..13].copy_from_slice(&header.width.to_le_bytes());
    out[13..17].copy_from_slice(&header.height.to_le_bytes());

    Ok(HEADER_SIZE)
}

/// Decodes a frame header from the start of `buf`.
///
/// Trailing bytes are ignored; they belong to the payload.
pub fn decode_header(buf: &[u8], limits: &Limits) -> WireResult<FrameHeader> {
    let Some(header) = buf.get(..HEADER_SIZE) else {
        return Err(DecodeError::HeaderTooSmall {
            actual: buf.len(),
            required: HEADER_SIZE,
        });
    };

    let encoding = Encoding::parse(read_u32(header, 0))?;
    let compressed = match header[4] {
        0 => false,
        1 => true,
        flag => return Err(DecodeError::InvalidCompressionFlag { flag }),
    };
    let format = PixelFormat::parse(read_u32(header, 5))?;
    let width = read_u32(header, 9);
    let height = read_u32(header, 13);

    check_limit(LimitKind::Width, limits.max_width, width as usize)?;
    check_limit(LimitKind::Height, limits.max_height, height as usize)?;

    let header = FrameHeader {
        encoding,
        compressed,
        format,
        width,
        height,
    };
    check_limit(
        LimitKind::FrameBytes,
        limits.max_frame_bytes,
        header.frame_len()?,
    )?;

    Ok(header)
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

pub(crate) const fn check_limit(kind: LimitKind, limit: usize, actual: usize) -> WireResult<()> {
    if actual > limit {
        return Err(DecodeError::LimitsExceeded {
            kind,
            limit,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l8_header() -> FrameHeader {
        FrameHeader::new(Encoding::TemporalDiff, false, PixelFormat::L8, 2, 1)
    }

    #[test]
    fn header_size_is_correct() {
        // encoding(4) + compressed(1) + format(4) + width(4) + height(4)
        assert_eq!(HEADER_SIZE, 17);
    }

    #[test]
    fn encode_header_layout() {
        let header = FrameHeader::new(Encoding::SpatialDiff, true, PixelFormat::R8G8B8, 640, 480);
        let mut buf = [0u8; HEADER_SIZE];
        assert_eq!(encode_header(&header, &mut buf), Ok(HEADER_SIZE));
        assert_eq!(
            buf,
            [2, 0, 0, 0, 1, 0, 0, 0, 0, 0x80, 0x02, 0, 0, 0xE0, 0x01, 0, 0]
        );
    }

    #[test]
    fn header_roundtrip() {
        let header = l8_header();
        let mut buf = [0u8; 32];
        encode_header(&header, &mut buf).unwrap();
        assert_eq!(decode_header(&buf, &Limits::default()), Ok(header));
    }

    #[test]
    fn encode_header_buffer_too_small() {
        let mut buf = [0u8; 16];
        assert_eq!(
            encode_header(&l8_header(), &mut buf),
            Err(EncodeError::BufferTooSmall {
                needed: 17,
                available: 16
            })
        );
    }

    #[test]
    fn decode_header_too_small() {
        let err = decode_header(&[0u8; 10], &Limits::default()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::HeaderTooSmall {
                actual: 10,
                required: 17
            }
        );
    }

    #[test]
    fn decode_header_unknown_tags() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&l8_header(), &mut buf).unwrap();

        let mut bad_encoding = buf;
        bad_encoding[0] = 3;
        assert_eq!(
            decode_header(&bad_encoding, &Limits::default()),
            Err(DecodeError::UnknownEncoding { tag: 3 })
        );

        let mut bad_format = buf;
        bad_format[8] = 0xFF;
        assert_eq!(
            decode_header(&bad_format, &Limits::default()),
            Err(DecodeError::UnknownPixelFormat { tag: 0xFF00_0001 })
        );
    }

    #[test]
    fn decode_header_invalid_flag() {
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&l8_header(), &mut buf).unwrap();
        buf[4] = 2;
        assert_eq!(
            decode_header(&buf, &Limits::default()),
            Err(DecodeError::InvalidCompressionFlag { flag: 2 })
        );
    }

    #[test]
    fn decode_header_enforces_limits() {
        let header = FrameHeader::new(Encoding::Raw, false, PixelFormat::R8G8B8, 64, 64);
        let mut buf = [0u8; HEADER_SIZE];
        encode_header(&header, &mut buf).unwrap();

        let err = decode_header(&buf, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::FrameBytes,
                ..
            }
        ));

        let wide = FrameHeader::new(Encoding::Raw, false, PixelFormat::L8, 1 << 20, 1);
        encode_header(&wide, &mut buf).unwrap();
        let err = decode_header(&buf, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::Width,
                ..
            }
        ));
    }

    #[test]
    fn frame_len_uses_bytes_per_pixel() {
        assert_eq!(frame_len(4, 2, PixelFormat::R8G8B8), Ok(24));
        assert_eq!(frame_len(4, 2, PixelFormat::BayerR8G8G8B8), Ok(8));
        assert_eq!(frame_len(0, 9, PixelFormat::L8), Ok(0));
    }
}
