//! Bit packing errors.

use std::fmt;

/// Shorthand for results of bit writer and reader calls.
pub type BitResult<T> = Result<T, BitError>;

/// Failure of a single bit writer or reader call. The cursor is left where
/// it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// The reader ran out of input.
    UnexpectedEof {
        /// Bits the call needed.
        requested: usize,
        /// Bits left in the input.
        available: usize,
    },

    /// Width argument of zero or above `max_bits`.
    InvalidBitCount { bits: u8, max_bits: u8 },

    /// `value` has bits set above the requested width.
    ValueOutOfRange { value: u32, bits: u8 },

    /// Byte-aligned access while the cursor sits inside a byte.
    MisalignedAccess { bit_position: usize },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => write!(
                f,
                "end of input: needed {requested} bits, {available} left"
            ),
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "bit width {bits} outside 1..={max_bits}")
            }
            Self::ValueOutOfRange { value, bits } => {
                write!(f, "{value:#x} does not fit in {bits} bits")
            }
            Self::MisalignedAccess { bit_position } => {
                write!(f, "aligned access at bit {bit_position}, which is mid-byte")
            }
        }
    }
}

impl std::error::Error for BitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_message_has_counts() {
        let msg = BitError::UnexpectedEof {
            requested: 12,
            available: 4,
        }
        .to_string();
        assert!(msg.contains("12 bits"));
        assert!(msg.contains("4 left"));
    }

    #[test]
    fn width_message_has_bounds() {
        let msg = BitError::InvalidBitCount {
            bits: 0,
            max_bits: 32,
        }
        .to_string();
        assert!(msg.contains("width 0"));
        assert!(msg.contains("1..=32"));
    }

    #[test]
    fn range_message_is_hex() {
        let msg = BitError::ValueOutOfRange { value: 16, bits: 4 }.to_string();
        assert!(msg.contains("0x10"));
        assert!(msg.contains("4 bits"));
    }

    #[test]
    fn misaligned_message_has_position() {
        let msg = BitError::MisalignedAccess { bit_position: 13 }.to_string();
        assert!(msg.contains("bit 13"));
    }

    #[test]
    fn is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BitError::MisalignedAccess {
            bit_position: 1,
        });
        assert!(err.source().is_none());
    }
}
