//! Secondary zlib pass over a payload section.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::error::{CodecError, CodecResult, LimitKind};

/// Highest zlib level accepted by [`EncodeOptions`](crate::EncodeOptions).
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Compresses `data` with zlib at `level`. Output is deterministic for a
/// given input and level.
pub(crate) fn deflate(data: &[u8], level: u32) -> CodecResult<Vec<u8>> {
    if level > MAX_COMPRESSION_LEVEL {
        return Err(CodecError::InvalidCompressionLevel { level });
    }
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level),
    );
    encoder
        .write_all(data)
        .map_err(|err| CodecError::compression(&err))?;
    encoder.finish().map_err(|err| CodecError::compression(&err))
}

/// Inflates a zlib stream, refusing to produce more than `max_len` bytes.
pub(crate) fn inflate(data: &[u8], max_len: usize) -> CodecResult<Vec<u8>> {
    let cap = u64::try_from(max_len).unwrap_or(u64::MAX).saturating_add(1);
    let mut decoder = ZlibDecoder::new(data).take(cap);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).min(max_len));
    decoder
        .read_to_end(&mut out)
        .map_err(|err| CodecError::compression(&err))?;

    if out.len() > max_len {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::InflatedBytes,
            limit: max_len,
            actual: out.len(),
        });
    }
    Ok(out)
}
