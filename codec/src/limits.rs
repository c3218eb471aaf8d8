//! Limits for codec-level decoding.

use wire::Limits as WireLimits;

/// Codec-specific limits enforced during frame decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecLimits {
    /// Header and payload framing limits.
    pub wire: WireLimits,
    /// Maximum size of a payload section after zlib inflation.
    pub max_inflated_bytes: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        let wire = WireLimits::default();
        Self {
            // Inflated section is the codec body plus its length prefix.
            max_inflated_bytes: wire.max_payload_bytes + wire::PAYLOAD_PREFIX_SIZE,
            wire,
        }
    }
}

impl CodecLimits {
    /// Creates limits suitable for testing with smaller values.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            wire: WireLimits::for_testing(),
            max_inflated_bytes: 8192,
        }
    }

    /// Creates limits with no restrictions (use with caution).
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            wire: WireLimits::unlimited(),
            max_inflated_bytes: usize::MAX,
        }
    }
}
