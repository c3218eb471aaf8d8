//! Introspection and debugging tools for the framedelta codec.
//!
//! This crate provides utilities for inspecting and understanding encoded
//! frames:
//!
//! - Read and print the frame header
//! - Explain the stream size against the raw frame size
//! - Encode and decode raw pixel files from the command line
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to understand what the codec is doing.

use std::fmt::Write as _;

use codec::{peek_header, CodecLimits, CodecResult, FrameHeader};
use serde::Serialize;

/// Summary of one encoded frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    /// Decoded frame header.
    pub header: FrameHeader,
    /// Header plus payload section, trailing bytes excluded.
    pub encoded_bytes: usize,
    /// Length of the payload section after the header, prefix excluded.
    pub payload_bytes: usize,
    /// Bytes after the payload section. Decoding rejects a frame when this
    /// is non-zero.
    pub trailing_bytes: usize,
    /// Size of the decoded pixel buffer.
    pub frame_bytes: usize,
    /// `frame_bytes / encoded_bytes`; above 1.0 means the stream is smaller.
    pub ratio: f64,
}

/// Reads the header and payload framing of `bytes` without decoding pixels.
///
/// Works for temporal-diff frames without their reference frame.
pub fn inspect_frame(bytes: &[u8], limits: &CodecLimits) -> CodecResult<InspectReport> {
    let header = peek_header(bytes, limits)?;
    let frame_bytes = header.frame_len()?;
    let rest = &bytes[wire::HEADER_SIZE..];
    let (payload, consumed) = wire::decode_payload(rest, &limits.wire)?;
    let encoded_bytes = wire::HEADER_SIZE + consumed;
    let trailing_bytes = rest.len() - consumed;
    if trailing_bytes > 0 {
        tracing::warn!(trailing_bytes, "bytes after payload section");
    }

    #[allow(clippy::cast_precision_loss)]
    let ratio = frame_bytes as f64 / encoded_bytes as f64;

    Ok(InspectReport {
        header,
        encoded_bytes,
        payload_bytes: payload.len(),
        trailing_bytes,
        frame_bytes,
        ratio,
    })
}

/// Renders a report as aligned `key: value` lines.
pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let header = &report.header;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "encoding: {} compressed: {}",
        header.encoding, header.compressed
    );
    let _ = writeln!(
        out,
        "format: {} ({} bytes/pixel, stride {})",
        header.format,
        header.format.bytes_per_pixel(),
        header.format.channel_stride()
    );
    let _ = writeln!(out, "size: {}x{}", header.width, header.height);
    let _ = writeln!(
        out,
        "frame: {} bytes, payload: {} bytes, stream: {} bytes",
        report.frame_bytes, report.payload_bytes, report.encoded_bytes
    );
    if report.trailing_bytes > 0 {
        let _ = writeln!(
            out,
            "trailing: {} bytes after payload (frame will not decode)",
            report.trailing_bytes
        );
    }
    let _ = write!(out, "ratio: {:.2}", report.ratio);
    out
}
