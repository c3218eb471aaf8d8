//! Configurable limits for bounded decoding.

/// Wire-level limits for frame decoding.
///
/// These limits are enforced during decoding to prevent resource exhaustion
/// from hostile headers and decompression bombs, and ensure bounded memory
/// usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum frame width in pixels.
    pub max_width: usize,

    /// Maximum frame height in pixels.
    pub max_height: usize,

    /// Maximum decoded frame size in bytes.
    pub max_frame_bytes: usize,

    /// Maximum length of a payload section in bytes, before or after
    /// decompression.
    pub max_payload_bytes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_width: 16 * 1024,
            max_height: 16 * 1024,
            // 256 MiB covers a 16k x 16k L8 frame or a 8k x 8k RGB one
            max_frame_bytes: 256 * 1024 * 1024,
            max_payload_bytes: 256 * 1024 * 1024,
        }
    }
}

impl Limits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_width: 256,
            max_height: 256,
            max_frame_bytes: 4096,
            max_payload_bytes: 8192,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_width: usize::MAX,
            max_height: usize::MAX,
            max_frame_bytes: usize::MAX,
            max_payload_bytes: usize::MAX,
        }
    }
}
