//! Delta codec core: 4-bit temporal and spatial byte deltas with escapes.
//!
//! Every byte is coded as one 4-bit code. Codes `0..=14` carry the delta
//! shifted by [`MAX_DELTA`]; code [`ESCAPE_CODE`] is followed by the byte as
//! an 8-bit literal. Both predictors therefore cover deltas in `-7..=7`.
//!
//! These constants are part of the wire format.

use bitstream::{BitReader, BitWriter};

use crate::error::{CodecError, CodecResult};
use crate::types::DeltaStats;

/// Largest delta magnitude coded without an escape.
pub const MAX_DELTA: i16 = 7;

/// Largest shifted delta (`delta + MAX_DELTA`) that fits a code.
pub const MAX_SHIFT_DELTA: u8 = 14;

/// Code announcing an 8-bit literal.
pub const ESCAPE_CODE: u8 = 15;

/// Width of a delta code.
pub const CODE_BITS: u8 = 4;

/// Width of a literal byte.
pub const LITERAL_BITS: u8 = 8;

/// Maps a delta to its code, or `None` if it needs an escape.
fn delta_code(delta: i16) -> Option<u8> {
    u8::try_from(delta + MAX_DELTA)
        .ok()
        .filter(|&code| code <= MAX_SHIFT_DELTA)
}

fn write_predicted(
    writer: &mut BitWriter,
    value: u8,
    reference: u8,
    stats: &mut DeltaStats,
) -> CodecResult<()> {
    match delta_code(i16::from(value) - i16::from(reference)) {
        Some(code) => {
            writer.write_bits(u32::from(code), CODE_BITS)?;
            stats.delta_codes += 1;
        }
        None => {
            writer.write_bits(u32::from(ESCAPE_CODE), CODE_BITS)?;
            writer.write_bits(u32::from(value), LITERAL_BITS)?;
            stats.escapes += 1;
        }
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn read_literal(reader: &mut BitReader<'_>) -> CodecResult<u8> {
    Ok(reader.read_bits(LITERAL_BITS)? as u8)
}

#[allow(clippy::cast_possible_truncation)]
fn read_predicted(reader: &mut BitReader<'_>, reference: u8, index: usize) -> CodecResult<u8> {
    let code = reader.read_bits(CODE_BITS)? as u8;
    if code == ESCAPE_CODE {
        return read_literal(reader);
    }
    let value = i16::from(reference) + i16::from(code) - MAX_DELTA;
    u8::try_from(value).map_err(|_| CodecError::DeltaOutOfRange {
        index,
        reference,
        code,
    })
}

/// Codes `current` against the same positions of `previous`.
///
/// Both slices must have the same length.
pub(crate) fn encode_temporal(
    current: &[u8],
    previous: &[u8],
    writer: &mut BitWriter,
) -> CodecResult<DeltaStats> {
    debug_assert_eq!(current.len(), previous.len());
    let mut stats = DeltaStats::default();
    let mut region = writer.bit_region();
    for (&value, &reference) in current.iter().zip(previous) {
        write_predicted(&mut region, value, reference, &mut stats)?;
    }
    Ok(stats)
}

/// Decodes a temporal region into `out`, predicting from `previous`.
pub(crate) fn decode_temporal(
    reader: &mut BitReader<'_>,
    previous: &[u8],
    out: &mut [u8],
) -> CodecResult<()> {
    debug_assert_eq!(out.len(), previous.len());
    let mut region = reader.bit_region();
    for (index, (slot, &reference)) in out.iter_mut().zip(previous).enumerate() {
        *slot = read_predicted(&mut region, reference, index)?;
    }
    Ok(())
}

/// Codes `current` against the byte `stride` positions earlier.
///
/// The first `stride` bytes have no predictor and are written as literals.
pub(crate) fn encode_spatial(
    current: &[u8],
    stride: usize,
    writer: &mut BitWriter,
) -> CodecResult<DeltaStats> {
    debug_assert!(stride > 0);
    let lead = stride.min(current.len());
    let mut stats = DeltaStats::default();
    let mut region = writer.bit_region();
    for &value in &current[..lead] {
        region.write_bits(u32::from(value), LITERAL_BITS)?;
        stats.literal_bytes += 1;
    }
    for (index, &value) in current.iter().enumerate().skip(lead) {
        write_predicted(&mut region, value, current[index - stride], &mut stats)?;
    }
    Ok(stats)
}

/// Decodes a spatial region into `out`.
pub(crate) fn decode_spatial(
    reader: &mut BitReader<'_>,
    stride: usize,
    out: &mut [u8],
) -> CodecResult<()> {
    debug_assert!(stride > 0);
    let lead = stride.min(out.len());
    let mut region = reader.bit_region();
    for slot in &mut out[..lead] {
        *slot = read_literal(&mut region)?;
    }
    for index in lead..out.len() {
        out[index] = read_predicted(&mut region, out[index - stride], index)?;
    }
    Ok(())
}
