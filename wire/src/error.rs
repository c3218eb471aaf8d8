//! Errors raised while framing or unframing a frame stream.

use std::fmt;

/// Result of header and payload decoding.
pub type WireResult<T> = Result<T, DecodeError>;

/// High-level decode errors for frame framing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Input is too small to contain the frame header.
    HeaderTooSmall { actual: usize, required: usize },

    /// Unrecognized encoding tag.
    UnknownEncoding { tag: u32 },

    /// Unrecognized pixel format tag.
    UnknownPixelFormat { tag: u32 },

    /// Secondary compression flag is neither 0 nor 1.
    InvalidCompressionFlag { flag: u8 },

    /// `width * height * bytes_per_pixel` does not fit in memory.
    FrameSizeOverflow { width: u32, height: u32 },

    /// Payload section is shorter than its length prefix claims.
    PayloadTruncated { needed: usize, available: usize },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Specific wire limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Width,
    Height,
    FrameBytes,
    PayloadBytes,
}

/// Header or payload could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Output slice shorter than the header.
    BufferTooSmall { needed: usize, available: usize },
    /// Payload longer than a `u32` length prefix can describe.
    LengthOverflow { length: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderTooSmall { actual, required } => {
                write!(
                    f,
                    "frame too small: {actual} bytes, need at least {required}"
                )
            }
            Self::UnknownEncoding { tag } => write!(f, "unknown encoding tag: {tag}"),
            Self::UnknownPixelFormat { tag } => write!(f, "unknown pixel format tag: {tag}"),
            Self::InvalidCompressionFlag { flag } => {
                write!(f, "invalid compression flag: 0x{flag:02X}")
            }
            Self::FrameSizeOverflow { width, height } => {
                write!(f, "frame size overflow for {width}x{height}")
            }
            Self::PayloadTruncated { needed, available } => {
                write!(
                    f,
                    "truncated payload: need {needed} bytes, have {available}"
                )
            }
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
            Self::Width => "width",
            Self::Height => "height",
            Self::FrameBytes => "frame bytes",
            Self::PayloadBytes => "payload bytes",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, available } => {
                write!(f, "buffer too small: need {needed}, have {available}")
            }
            Self::LengthOverflow { length } => {
                write!(f, "length overflow: {length}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}
