//! Frame envelope: header, encoding selection and payload dispatch.

use std::borrow::Cow;

use bitstream::{BitReader, BitWriter};
use wire::{Encoding, FrameHeader, PixelFormat, HEADER_SIZE};

use crate::compress;
use crate::delta;
use crate::error::{CodecError, CodecResult};
use crate::limits::CodecLimits;
use crate::types::{DeltaStats, FrameDesc};

/// Encoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Requested encoding. `TemporalDiff` falls back to `Raw` when no
    /// previous frame is supplied.
    pub preferred: Encoding,
    /// Run the payload through zlib.
    pub compress: bool,
    /// zlib level, `0..=9`. Ignored unless `compress` is set.
    pub compression_level: u32,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::new(Encoding::SpatialDiff)
    }
}

impl EncodeOptions {
    /// Options for `preferred` without secondary compression.
    #[must_use]
    pub const fn new(preferred: Encoding) -> Self {
        Self {
            preferred,
            compress: false,
            compression_level: 6,
        }
    }

    /// Enables secondary compression at `level`.
    #[must_use]
    pub const fn with_compression(mut self, level: u32) -> Self {
        self.compress = true;
        self.compression_level = level;
        self
    }
}

/// A decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub header: FrameHeader,
    pub pixels: Vec<u8>,
}

impl DecodedFrame {
    /// Dimensions and layout of the decoded pixels.
    #[must_use]
    pub fn desc(&self) -> FrameDesc {
        FrameDesc::from(&self.header)
    }
}

/// Resolved encoding with exactly the inputs each strategy needs.
#[derive(Debug, Clone, Copy)]
enum Plan<'a> {
    Raw,
    Temporal { previous: &'a [u8] },
    Spatial { stride: usize },
}

impl<'a> Plan<'a> {
    fn for_encode(preferred: Encoding, previous: Option<&'a [u8]>, format: PixelFormat) -> Self {
        match (preferred, previous) {
            (Encoding::Raw, _) => Self::Raw,
            (Encoding::TemporalDiff, Some(previous)) => Self::Temporal { previous },
            (Encoding::TemporalDiff, None) => {
                tracing::debug!("no previous frame, temporal diff downgraded to raw");
                Self::Raw
            }
            (Encoding::SpatialDiff, _) => Self::Spatial {
                stride: format.channel_stride(),
            },
        }
    }

    fn for_decode(header: &FrameHeader, previous: Option<&'a [u8]>) -> CodecResult<Self> {
        Ok(match header.encoding {
            Encoding::Raw => Self::Raw,
            Encoding::TemporalDiff => Self::Temporal {
                previous: previous.ok_or(CodecError::MissingReferenceFrame)?,
            },
            Encoding::SpatialDiff => Self::Spatial {
                stride: header.format.channel_stride(),
            },
        })
    }

    const fn encoding(&self) -> Encoding {
        match self {
            Self::Raw => Encoding::Raw,
            Self::Temporal { .. } => Encoding::TemporalDiff,
            Self::Spatial { .. } => Encoding::SpatialDiff,
        }
    }

    /// Smallest body that can hold `frame_len` bytes: 8 bits per literal,
    /// at least 4 bits per predicted byte.
    fn min_body_len(&self, frame_len: usize) -> usize {
        match self {
            Self::Raw => frame_len,
            Self::Temporal { .. } => frame_len.div_ceil(2),
            Self::Spatial { stride } => {
                let lead = (*stride).min(frame_len);
                lead + (frame_len - lead).div_ceil(2)
            }
        }
    }

    /// Largest body `frame_len` bytes can produce: every predicted byte
    /// escaped, 12 bits each.
    fn max_body_len(&self, frame_len: usize) -> usize {
        match self {
            Self::Raw => frame_len,
            Self::Temporal { .. } => frame_len.saturating_mul(3).div_ceil(2),
            Self::Spatial { stride } => {
                let lead = (*stride).min(frame_len);
                lead + (frame_len - lead).saturating_mul(3).div_ceil(2)
            }
        }
    }

    fn check_body_len(&self, body_len: usize, frame_len: usize) -> CodecResult<()> {
        if let Self::Raw = self {
            if body_len != frame_len {
                return Err(CodecError::LengthMismatch {
                    expected: frame_len,
                    found: body_len,
                });
            }
        }
        let minimum = self.min_body_len(frame_len);
        if body_len < minimum {
            return Err(CodecError::BodyTooShort {
                minimum,
                actual: body_len,
            });
        }
        Ok(())
    }

    fn check_reference(&self, frame_len: usize) -> CodecResult<()> {
        if let Self::Temporal { previous } = self {
            if previous.len() != frame_len {
                return Err(CodecError::ReferenceLengthMismatch {
                    expected: frame_len,
                    actual: previous.len(),
                });
            }
        }
        Ok(())
    }
}

/// Returns the encoding [`encode_frame`] will write for `preferred`.
pub fn resolve_encoding(preferred: Encoding, previous: Option<&[u8]>) -> Encoding {
    match (preferred, previous) {
        (Encoding::TemporalDiff, None) => Encoding::Raw,
        (preferred, _) => preferred,
    }
}

/// Encodes a frame buffer into a fresh byte stream.
///
/// `previous` is only read for temporal-diff coding and must then be the
/// same length as `frame`.
pub fn encode_frame(
    frame: &[u8],
    previous: Option<&[u8]>,
    desc: FrameDesc,
    options: &EncodeOptions,
) -> CodecResult<Vec<u8>> {
    encode_frame_with_stats(frame, previous, desc, options).map(|(bytes, _)| bytes)
}

/// Like [`encode_frame`], also returning how the bytes were coded.
pub fn encode_frame_with_stats(
    frame: &[u8],
    previous: Option<&[u8]>,
    desc: FrameDesc,
    options: &EncodeOptions,
) -> CodecResult<(Vec<u8>, DeltaStats)> {
    let frame_len = desc.byte_len()?;
    if frame.len() != frame_len {
        return Err(CodecError::FrameLengthMismatch {
            expected: frame_len,
            actual: frame.len(),
        });
    }
    let plan = Plan::for_encode(options.preferred, previous, desc.format);
    plan.check_reference(frame_len)?;

    let (body, stats) = encode_body(frame, &plan)?;

    let header = FrameHeader::new(
        plan.encoding(),
        options.compress,
        desc.format,
        desc.width,
        desc.height,
    );
    let mut out = vec![0u8; HEADER_SIZE];
    wire::encode_header(&header, &mut out)?;

    if options.compress {
        let mut section = Vec::with_capacity(wire::PAYLOAD_PREFIX_SIZE + body.len());
        wire::encode_payload(&body, &mut section)?;
        let packed = compress::deflate(&section, options.compression_level)?;
        wire::encode_payload(&packed, &mut out)?;
    } else {
        wire::encode_payload(&body, &mut out)?;
    }

    tracing::debug!(
        encoding = %header.encoding,
        format = %header.format,
        width = header.width,
        height = header.height,
        compressed = header.compressed,
        frame_bytes = frame_len,
        encoded_bytes = out.len(),
        escapes = stats.escapes,
        "encoded frame"
    );
    Ok((out, stats))
}

fn encode_body<'f>(
    frame: &'f [u8],
    plan: &Plan<'_>,
) -> CodecResult<(Cow<'f, [u8]>, DeltaStats)> {
    match *plan {
        Plan::Raw => Ok((Cow::Borrowed(frame), DeltaStats::raw(frame.len()))),
        Plan::Temporal { previous } => {
            let mut writer = BitWriter::with_capacity(frame.len());
            let stats = delta::encode_temporal(frame, previous, &mut writer)?;
            Ok((Cow::Owned(writer.finish()), stats))
        }
        Plan::Spatial { stride } => {
            let mut writer = BitWriter::with_capacity(frame.len());
            let stats = delta::encode_spatial(frame, stride, &mut writer)?;
            Ok((Cow::Owned(writer.finish()), stats))
        }
    }
}

/// Reads and validates the frame header without touching the payload.
pub fn peek_header(bytes: &[u8], limits: &CodecLimits) -> CodecResult<FrameHeader> {
    Ok(wire::decode_header(bytes, &limits.wire)?)
}

/// Decodes a byte stream into a new frame buffer.
///
/// The encoding tag in the stream is authoritative: a temporal-diff frame
/// fails with [`CodecError::MissingReferenceFrame`] when `previous` is `None`.
/// The pixel buffer is only allocated once the payload is known to be long
/// enough for the frame the header describes.
pub fn decode_frame(
    bytes: &[u8],
    previous: Option<&[u8]>,
    limits: &CodecLimits,
) -> CodecResult<DecodedFrame> {
    let header = peek_header(bytes, limits)?;
    let frame_len = header.frame_len()?;
    let plan = Plan::for_decode(&header, previous)?;
    plan.check_reference(frame_len)?;

    let rest = &bytes[HEADER_SIZE..];
    let (section, consumed) = wire::decode_payload(rest, &limits.wire)?;
    ensure_consumed(rest.len(), consumed)?;

    let inflated;
    let body = if header.compressed {
        let max_inflated = plan
            .max_body_len(frame_len)
            .saturating_add(wire::PAYLOAD_PREFIX_SIZE)
            .min(limits.max_inflated_bytes);
        inflated = compress::inflate(section, max_inflated)?;
        let (inner, used) = wire::decode_payload(&inflated, &limits.wire)?;
        ensure_consumed(inflated.len(), used)?;
        inner
    } else {
        section
    };
    plan.check_body_len(body.len(), frame_len)?;

    let mut pixels = vec![0u8; frame_len];
    decode_body(&plan, body, &mut pixels)?;

    tracing::debug!(
        encoding = %header.encoding,
        format = %header.format,
        width = header.width,
        height = header.height,
        compressed = header.compressed,
        body_bytes = body.len(),
        "decoded frame"
    );
    Ok(DecodedFrame { header, pixels })
}

/// Decodes a byte stream into a caller-owned frame buffer.
///
/// `out` must match the frame size in the header. It is only written once
/// the whole frame has decoded successfully.
pub fn decode_frame_into(
    bytes: &[u8],
    previous: Option<&[u8]>,
    out: &mut [u8],
    limits: &CodecLimits,
) -> CodecResult<FrameHeader> {
    let expected = peek_header(bytes, limits)?.frame_len()?;
    if out.len() != expected {
        return Err(CodecError::FrameLengthMismatch {
            expected,
            actual: out.len(),
        });
    }
    let decoded = decode_frame(bytes, previous, limits)?;
    out.copy_from_slice(&decoded.pixels);
    Ok(decoded.header)
}

fn decode_body(plan: &Plan<'_>, body: &[u8], out: &mut [u8]) -> CodecResult<()> {
    match *plan {
        Plan::Raw => out.copy_from_slice(body),
        Plan::Temporal { previous } => {
            let mut reader = BitReader::new(body);
            delta::decode_temporal(&mut reader, previous, out)?;
            ensure_consumed(body.len(), reader.bit_position() / 8)?;
        }
        Plan::Spatial { stride } => {
            let mut reader = BitReader::new(body);
            delta::decode_spatial(&mut reader, stride, out)?;
            ensure_consumed(body.len(), reader.bit_position() / 8)?;
        }
    }
    Ok(())
}

fn ensure_consumed(available: usize, consumed: usize) -> CodecResult<()> {
    if consumed < available {
        return Err(CodecError::TrailingBytes {
            count: available - consumed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const L8_2X1: FrameDesc = FrameDesc::new(2, 1, PixelFormat::L8);

    #[test]
    fn resolve_encoding_downgrades_temporal_only() {
        assert_eq!(resolve_encoding(Encoding::TemporalDiff, None), Encoding::Raw);
        assert_eq!(
            resolve_encoding(Encoding::TemporalDiff, Some(&[0])),
            Encoding::TemporalDiff
        );
        assert_eq!(
            resolve_encoding(Encoding::SpatialDiff, None),
            Encoding::SpatialDiff
        );
        assert_eq!(resolve_encoding(Encoding::Raw, Some(&[0])), Encoding::Raw);
    }

    #[test]
    fn temporal_concrete_scenario_bytes() {
        let bytes = encode_frame(
            &[12, 100],
            Some(&[10, 200]),
            L8_2X1,
            &EncodeOptions::new(Encoding::TemporalDiff),
        )
        .unwrap();
        assert_eq!(
            bytes,
            vec![
                1, 0, 0, 0, // encoding_tag
                0, // secondary_compress_flag
                1, 0, 0, 0, // format_tag
                2, 0, 0, 0, // width
                1, 0, 0, 0, // height
                2, 0, 0, 0, // bit payload length
                0x9F, 0x64, // code 9, escape, literal 100
            ]
        );

        let decoded = decode_frame(&bytes, Some(&[10, 200]), &CodecLimits::default()).unwrap();
        assert_eq!(decoded.pixels, vec![12, 100]);
        assert_eq!(decoded.desc(), L8_2X1);
    }

    #[test]
    fn raw_layout() {
        let bytes = encode_frame(&[5, 6], None, L8_2X1, &EncodeOptions::new(Encoding::Raw))
            .unwrap();
        assert_eq!(&bytes[HEADER_SIZE..], &[2, 0, 0, 0, 5, 6]);
    }

    #[test]
    fn temporal_without_previous_writes_raw_tag() {
        let bytes = encode_frame(
            &[1, 2],
            None,
            L8_2X1,
            &EncodeOptions::new(Encoding::TemporalDiff),
        )
        .unwrap();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 0]);
        let decoded = decode_frame(&bytes, None, &CodecLimits::default()).unwrap();
        assert_eq!(decoded.header.encoding, Encoding::Raw);
        assert_eq!(decoded.pixels, vec![1, 2]);
    }

    #[test]
    fn decode_temporal_requires_previous() {
        let bytes = encode_frame(
            &[1, 2],
            Some(&[1, 1]),
            L8_2X1,
            &EncodeOptions::new(Encoding::TemporalDiff),
        )
        .unwrap();
        let err = decode_frame(&bytes, None, &CodecLimits::default()).unwrap_err();
        assert_eq!(err, CodecError::MissingReferenceFrame);
    }

    #[test]
    fn encode_rejects_wrong_lengths() {
        let options = EncodeOptions::new(Encoding::TemporalDiff);
        assert_eq!(
            encode_frame(&[1, 2, 3], None, L8_2X1, &options),
            Err(CodecError::FrameLengthMismatch {
                expected: 2,
                actual: 3
            })
        );
        assert_eq!(
            encode_frame(&[1, 2], Some(&[1]), L8_2X1, &options),
            Err(CodecError::ReferenceLengthMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn compressed_roundtrip() {
        let desc = FrameDesc::new(16, 16, PixelFormat::R8G8B8);
        let frame: Vec<u8> = (0..desc.byte_len().unwrap())
            .map(|i| (i / 3 % 251) as u8)
            .collect();
        let options = EncodeOptions::new(Encoding::SpatialDiff).with_compression(9);
        let bytes = encode_frame(&frame, None, desc, &options).unwrap();
        assert_eq!(bytes[4], 1);

        let decoded = decode_frame(&bytes, None, &CodecLimits::default()).unwrap();
        assert!(decoded.header.compressed);
        assert_eq!(decoded.pixels, frame);
    }

    #[test]
    fn trailing_bytes_rejected() {
        let mut bytes =
            encode_frame(&[5, 6], None, L8_2X1, &EncodeOptions::new(Encoding::Raw)).unwrap();
        bytes.push(0);
        let err = decode_frame(&bytes, None, &CodecLimits::default()).unwrap_err();
        assert_eq!(err, CodecError::TrailingBytes { count: 1 });
    }

    #[test]
    fn decode_into_leaves_buffer_on_error() {
        let bytes = encode_frame(
            &[9, 9],
            Some(&[8, 8]),
            L8_2X1,
            &EncodeOptions::new(Encoding::TemporalDiff),
        )
        .unwrap();
        let mut out = [0xAAu8; 2];
        let truncated = &bytes[..bytes.len() - 1];
        assert!(decode_frame_into(truncated, Some(&[8, 8]), &mut out, &CodecLimits::default())
            .is_err());
        assert_eq!(out, [0xAA, 0xAA]);

        let header =
            decode_frame_into(&bytes, Some(&[8, 8]), &mut out, &CodecLimits::default()).unwrap();
        assert_eq!(header.encoding, Encoding::TemporalDiff);
        assert_eq!(out, [9, 9]);
    }

    fn stream(header: FrameHeader, body: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; HEADER_SIZE];
        wire::encode_header(&header, &mut out).unwrap();
        wire::encode_payload(body, &mut out).unwrap();
        out
    }

    #[test]
    fn oversized_header_with_tiny_body_is_rejected() {
        let limits = CodecLimits::default();
        let huge = |encoding| FrameHeader::new(encoding, false, PixelFormat::L8, 16384, 16384);

        let err = decode_frame(&stream(huge(Encoding::Raw), &[]), None, &limits).unwrap_err();
        assert_eq!(
            err,
            CodecError::LengthMismatch {
                expected: 16384 * 16384,
                found: 0
            }
        );

        let bytes = stream(huge(Encoding::SpatialDiff), &[1, 2]);
        let err = decode_frame(&bytes, None, &limits).unwrap_err();
        assert_eq!(
            err,
            CodecError::BodyTooShort {
                minimum: 1 + (16384 * 16384 - 1) / 2 + 1,
                actual: 2
            }
        );
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfStream);

        let mut out = [0u8; 4];
        let err = decode_frame_into(&stream(huge(Encoding::Raw), &[]), None, &mut out, &limits)
            .unwrap_err();
        assert!(matches!(err, CodecError::FrameLengthMismatch { .. }));
    }

    #[test]
    fn short_diff_body_is_rejected_before_decoding() {
        let header = FrameHeader::new(Encoding::TemporalDiff, false, PixelFormat::L8, 5, 1);
        let bytes = stream(header, &[0x77, 0x77]);
        let err = decode_frame(&bytes, Some(&[0; 5]), &CodecLimits::default()).unwrap_err();
        assert_eq!(
            err,
            CodecError::BodyTooShort {
                minimum: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn body_bounds_hold_for_extreme_frames() {
        for format in PixelFormat::ALL {
            let desc = FrameDesc::new(5, 3, format);
            let len = desc.byte_len().unwrap();
            let zeros = vec![0u8; len];
            let stripes: Vec<u8> = (0..len).map(|i| if i % 2 == 0 { 0 } else { 200 }).collect();
            let flipped: Vec<u8> = stripes.iter().map(|b| 200 - b).collect();
            for (encoding, previous) in [
                (Encoding::TemporalDiff, &zeros),
                (Encoding::TemporalDiff, &flipped),
                (Encoding::SpatialDiff, &zeros),
            ] {
                for frame in [&zeros, &stripes] {
                    let plan = Plan::for_encode(encoding, Some(previous.as_slice()), format);
                    let (body, _) = encode_body(frame, &plan).unwrap();
                    assert!(body.len() >= plan.min_body_len(len), "{encoding} {format}");
                    assert!(body.len() <= plan.max_body_len(len), "{encoding} {format}");
                }
            }
        }
    }
}
