//! Error types for codec operations.

use std::fmt;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Wire format error while decoding.
    Wire(wire::DecodeError),

    /// Wire format error while encoding.
    WireEncode(wire::EncodeError),

    /// Bitstream error.
    Bitstream(bitstream::BitError),

    /// Frame buffer length does not match `width * height * bytes_per_pixel`.
    FrameLengthMismatch { expected: usize, actual: usize },

    /// Previous frame length does not match the current frame.
    ReferenceLengthMismatch { expected: usize, actual: usize },

    /// Stream is temporal-diff coded but no previous frame was supplied.
    MissingReferenceFrame,

    /// Raw payload length does not match the header dimensions.
    LengthMismatch { expected: usize, found: usize },

    /// Payload body is shorter than any coding of the frame could be.
    BodyTooShort { minimum: usize, actual: usize },

    /// A delta code points outside the byte range.
    DeltaOutOfRange { index: usize, reference: u8, code: u8 },

    /// Bytes were left over after the payload was fully decoded.
    TrailingBytes { count: usize },

    /// zlib level outside `0..=9`.
    InvalidCompressionLevel { level: u32 },

    /// The secondary compression pass failed.
    Compression { message: String },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific codec limit that was exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    InflatedBytes,
}

/// Coarse classification of a [`CodecError`].
///
/// Callers that only need to decide between "fix the call", "the input is
/// truncated" and "the input is from something else" can match on this
/// instead of the detailed error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed call parameters.
    InvalidArgument,
    /// Input ended before a value was complete.
    UnexpectedEndOfStream,
    /// Temporal-diff stream decoded without a previous frame.
    MissingReferenceFrame,
    /// Unrecognized tag or corrupt payload.
    FormatMismatch,
    /// A configured decoding limit rejected the input.
    LimitExceeded,
}

impl CodecError {
    /// Returns the coarse error classification.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Wire(err) => match err {
                wire::DecodeError::HeaderTooSmall { .. }
                | wire::DecodeError::PayloadTruncated { .. } => ErrorKind::UnexpectedEndOfStream,
                wire::DecodeError::LimitsExceeded { .. }
                | wire::DecodeError::FrameSizeOverflow { .. } => ErrorKind::LimitExceeded,
                _ => ErrorKind::FormatMismatch,
            },
            Self::Bitstream(bitstream::BitError::UnexpectedEof { .. })
            | Self::BodyTooShort { .. } => ErrorKind::UnexpectedEndOfStream,
            Self::WireEncode(_)
            | Self::Bitstream(_)
            | Self::FrameLengthMismatch { .. }
            | Self::ReferenceLengthMismatch { .. }
            | Self::InvalidCompressionLevel { .. } => ErrorKind::InvalidArgument,
            Self::MissingReferenceFrame => ErrorKind::MissingReferenceFrame,
            Self::LengthMismatch { .. }
            | Self::DeltaOutOfRange { .. }
            | Self::TrailingBytes { .. }
            | Self::Compression { .. } => ErrorKind::FormatMismatch,
            Self::LimitsExceeded { .. } => ErrorKind::LimitExceeded,
        }
    }

    pub(crate) fn compression(err: &std::io::Error) -> Self {
        Self::Compression {
            message: err.to_string(),
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "wire error: {e}"),
            Self::WireEncode(e) => write!(f, "wire encode error: {e}"),
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::FrameLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "frame buffer is {actual} bytes, dimensions require {expected}"
                )
            }
            Self::ReferenceLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "previous frame is {actual} bytes, current frame is {expected}"
                )
            }
            Self::MissingReferenceFrame => {
                write!(f, "temporal-diff frame requires a previous frame")
            }
            Self::LengthMismatch { expected, found } => {
                write!(
                    f,
                    "raw payload length mismatch: expected {expected}, found {found}"
                )
            }
            Self::BodyTooShort { minimum, actual } => {
                write!(
                    f,
                    "payload body is {actual} bytes, frame needs at least {minimum}"
                )
            }
            Self::DeltaOutOfRange {
                index,
                reference,
                code,
            } => {
                write!(
                    f,
                    "delta code {code} applied to {reference} at byte {index} leaves the byte range"
                )
            }
            Self::TrailingBytes { count } => {
                write!(f, "{count} trailing bytes after payload")
            }
            Self::InvalidCompressionLevel { level } => {
                write!(f, "invalid compression level {level}, expected 0 to 9")
            }
            Self::Compression { message } => write!(f, "compression error: {message}"),
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InflatedBytes => "inflated bytes",
        };
        write!(f, "{name}")
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::WireEncode(e) => Some(e),
            Self::Bitstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::WireEncode(err)
    }
}

impl From<bitstream::BitError> for CodecError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_missing_reference() {
        let msg = CodecError::MissingReferenceFrame.to_string();
        assert!(msg.contains("previous frame"));
    }

    #[test]
    fn error_display_frame_length() {
        let err = CodecError::FrameLengthMismatch {
            expected: 6,
            actual: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains('6'));
        assert!(msg.contains('5'));
    }

    #[test]
    fn error_from_wire_error() {
        let wire_err = wire::DecodeError::UnknownEncoding { tag: 9 };
        let codec_err: CodecError = wire_err.into();
        assert!(matches!(codec_err, CodecError::Wire(_)));
        assert_eq!(codec_err.kind(), ErrorKind::FormatMismatch);
    }

    #[test]
    fn error_from_bitstream_error() {
        let bit_err = bitstream::BitError::UnexpectedEof {
            requested: 4,
            available: 0,
        };
        let codec_err: CodecError = bit_err.into();
        assert!(matches!(codec_err, CodecError::Bitstream(_)));
        assert_eq!(codec_err.kind(), ErrorKind::UnexpectedEndOfStream);
    }

    #[test]
    fn kind_classification() {
        let invalid = CodecError::Bitstream(bitstream::BitError::InvalidBitCount {
            bits: 40,
            max_bits: 32,
        });
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            CodecError::MissingReferenceFrame.kind(),
            ErrorKind::MissingReferenceFrame
        );
        assert_eq!(
            CodecError::Wire(wire::DecodeError::UnknownPixelFormat { tag: 5 }).kind(),
            ErrorKind::FormatMismatch
        );
        assert_eq!(
            CodecError::Wire(wire::DecodeError::PayloadTruncated {
                needed: 8,
                available: 2
            })
            .kind(),
            ErrorKind::UnexpectedEndOfStream
        );
        assert_eq!(
            CodecError::TrailingBytes { count: 1 }.kind(),
            ErrorKind::FormatMismatch
        );
        assert_eq!(
            CodecError::BodyTooShort {
                minimum: 8,
                actual: 2
            }
            .kind(),
            ErrorKind::UnexpectedEndOfStream
        );
    }

    #[test]
    fn error_source_wire() {
        let codec_err = CodecError::Wire(wire::DecodeError::UnknownEncoding { tag: 4 });
        assert!(std::error::Error::source(&codec_err).is_some());
    }

    #[test]
    fn error_source_none_for_others() {
        let err = CodecError::TrailingBytes { count: 3 };
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<CodecError>();
    }
}
