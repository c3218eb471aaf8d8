//! Pixel format and encoding tags.

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Pixel layout of a frame buffer.
///
/// Bytes per pixel and channel stride are a pure function of the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u32)]
pub enum PixelFormat {
    /// Packed 8-bit red, green, blue.
    #[cfg_attr(feature = "serde", serde(rename = "r8g8b8"))]
    R8G8B8 = 0,
    /// 8-bit luminance.
    #[cfg_attr(feature = "serde", serde(rename = "l8"))]
    L8 = 1,
    /// Raw Bayer mosaic, `RG` / `GB` rows, one byte per sample.
    #[cfg_attr(feature = "serde", serde(rename = "bayer"))]
    BayerR8G8G8B8 = 2,
}

impl PixelFormat {
    /// All formats in tag order.
    pub const ALL: [Self; 3] = [Self::R8G8B8, Self::L8, Self::BayerR8G8G8B8];

    /// Parses a pixel format from its wire tag.
    pub const fn parse(tag: u32) -> Result<Self, DecodeError> {
        match tag {
            0 => Ok(Self::R8G8B8),
            1 => Ok(Self::L8),
            2 => Ok(Self::BayerR8G8G8B8),
            _ => Err(DecodeError::UnknownPixelFormat { tag }),
        }
    }

    /// Returns the wire tag.
    #[must_use]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Number of bytes one pixel occupies in the frame buffer.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::R8G8B8 => 3,
            Self::L8 | Self::BayerR8G8G8B8 => 1,
        }
    }

    /// Distance in bytes between two samples of the same colour channel.
    ///
    /// Bayer rows alternate two channels, so the nearest same-channel sample
    /// is two bytes back.
    #[must_use]
    pub const fn channel_stride(self) -> usize {
        match self {
            Self::R8G8B8 => 3,
            Self::L8 => 1,
            Self::BayerR8G8G8B8 => 2,
        }
    }

    /// Short name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::R8G8B8 => "r8g8b8",
            Self::L8 => "l8",
            Self::BayerR8G8G8B8 => "bayer",
        }
    }
}

impl TryFrom<u32> for PixelFormat {
    type Error = DecodeError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Self::parse(tag)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError::new("pixel format", s))
    }
}

/// Frame payload encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[repr(u32)]
pub enum Encoding {
    /// Literal pixel bytes.
    Raw = 0,
    /// 4-bit deltas against the same byte of a previous frame.
    TemporalDiff = 1,
    /// 4-bit deltas against the previous same-channel byte of this frame.
    SpatialDiff = 2,
}

impl Encoding {
    /// All encodings in tag order.
    pub const ALL: [Self; 3] = [Self::Raw, Self::TemporalDiff, Self::SpatialDiff];

    /// Parses an encoding from its wire tag.
    pub const fn parse(tag: u32) -> Result<Self, DecodeError> {
        match tag {
            0 => Ok(Self::Raw),
            1 => Ok(Self::TemporalDiff),
            2 => Ok(Self::SpatialDiff),
            _ => Err(DecodeError::UnknownEncoding { tag }),
        }
    }

    /// Returns the wire tag.
    #[must_use]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Returns `true` if decoding needs the previous frame.
    #[must_use]
    pub const fn needs_reference(self) -> bool {
        matches!(self, Self::TemporalDiff)
    }

    /// Short name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::TemporalDiff => "temporal",
            Self::SpatialDiff => "spatial",
        }
    }
}

impl TryFrom<u32> for Encoding {
    type Error = DecodeError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        Self::parse(tag)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|encoding| encoding.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError::new("encoding", s))
    }
}

/// A name did not match any known pixel format or encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    kind: &'static str,
    name: String,
}

impl ParseNameError {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.name)
    }
}

impl std::error::Error for ParseNameError {}
