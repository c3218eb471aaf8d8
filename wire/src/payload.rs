//! Length-prefixed payload sections.

use crate::error::{DecodeError, EncodeError, LimitKind, WireResult};
use crate::header::check_limit;
use crate::limits::Limits;

/// Size of the `u32` length prefix.
pub const PAYLOAD_PREFIX_SIZE: usize = 4;

/// Appends `body` to `out` as a `u32`-length-prefixed section.
pub fn encode_payload(body: &[u8], out: &mut Vec<u8>) -> Result<usize, EncodeError> {
    let len = u32::try_from(body.len())
        .map_err(|_| EncodeError::LengthOverflow { length: body.len() })?;
    out.reserve(PAYLOAD_PREFIX_SIZE + body.len());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(body);
    Ok(PAYLOAD_PREFIX_SIZE + body.len())
}

/// Reads one length-prefixed section from the start of `buf`.
///
/// Returns the section body and the total number of bytes consumed.
pub fn decode_payload<'a>(buf: &'a [u8], limits: &Limits) -> WireResult<(&'a [u8], usize)> {
    let Some(prefix) = buf.get(..PAYLOAD_PREFIX_SIZE) else {
        return Err(DecodeError::PayloadTruncated {
            needed: PAYLOAD_PREFIX_SIZE,
            available: buf.len(),
        });
    };
    let mut len_bytes = [0u8; PAYLOAD_PREFIX_SIZE];
    len_bytes.copy_from_slice(prefix);
    let len = u32::from_le_bytes(len_bytes) as usize;

    check_limit(LimitKind::PayloadBytes, limits.max_payload_bytes, len)?;

    let truncated = |needed| DecodeError::PayloadTruncated {
        needed,
        available: buf.len(),
    };
    let end = PAYLOAD_PREFIX_SIZE
        .checked_add(len)
        .ok_or_else(|| truncated(usize::MAX))?;
    let body = buf
        .get(PAYLOAD_PREFIX_SIZE..end)
        .ok_or_else(|| truncated(end))?;
    Ok((body, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_roundtrip() {
        let mut out = vec![0xAA];
        let written = encode_payload(&[1, 2, 3], &mut out).unwrap();
        assert_eq!(written, 7);
        assert_eq!(out, vec![0xAA, 3, 0, 0, 0, 1, 2, 3]);

        let (body, consumed) = decode_payload(&out[1..], &Limits::default()).unwrap();
        assert_eq!(body, &[1, 2, 3]);
        assert_eq!(consumed, 7);
    }

    #[test]
    fn empty_payload() {
        let mut out = Vec::new();
        encode_payload(&[], &mut out).unwrap();
        let (body, consumed) = decode_payload(&out, &Limits::default()).unwrap();
        assert!(body.is_empty());
        assert_eq!(consumed, 4);
    }

    #[test]
    fn truncated_prefix() {
        assert_eq!(
            decode_payload(&[1, 0], &Limits::default()),
            Err(DecodeError::PayloadTruncated {
                needed: 4,
                available: 2
            })
        );
    }

    #[test]
    fn truncated_body() {
        assert_eq!(
            decode_payload(&[5, 0, 0, 0, 1, 2], &Limits::default()),
            Err(DecodeError::PayloadTruncated {
                needed: 9,
                available: 6
            })
        );
    }

    #[test]
    fn payload_limit() {
        let buf = 10_000u32.to_le_bytes();
        let err = decode_payload(&buf, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::PayloadBytes,
                limit: 8192,
                actual: 10_000
            }
        ));
    }

    #[test]
    fn max_length_prefix_is_truncated_not_overflow() {
        let buf = [0xFF, 0xFF, 0xFF, 0xFF, 1, 2];
        let err = decode_payload(&buf, &Limits::unlimited()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::PayloadTruncated { available: 6, .. }
        ));
    }
}
