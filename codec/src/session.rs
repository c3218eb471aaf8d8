//! Frame sequences that carry the previous frame between calls.

use wire::{Encoding, FrameHeader};

use crate::error::{CodecError, CodecResult};
use crate::frame::{
    decode_frame, encode_frame_with_stats, peek_header, resolve_encoding, EncodeOptions,
};
use crate::limits::CodecLimits;
use crate::types::{DeltaStats, FrameDesc};

/// Encodes a stream of same-sized frames, using each frame as the temporal
/// reference for the next.
#[derive(Debug)]
pub struct EncoderSession {
    desc: FrameDesc,
    options: EncodeOptions,
    key_frame_interval: Option<u32>,
    reference: Option<Vec<u8>>,
    temporal_run: u32,
    frames_encoded: u64,
}

impl EncoderSession {
    /// Creates a session for frames described by `desc`.
    #[must_use]
    pub const fn new(desc: FrameDesc, options: EncodeOptions) -> Self {
        Self {
            desc,
            options,
            key_frame_interval: None,
            reference: None,
            temporal_run: 0,
            frames_encoded: 0,
        }
    }

    /// Allows at most `interval` temporal-diff frames in a row before a
    /// self-contained frame is forced.
    #[must_use]
    pub const fn with_key_frame_interval(mut self, interval: u32) -> Self {
        self.key_frame_interval = Some(interval);
        self
    }

    /// Frame layout this session encodes.
    pub const fn desc(&self) -> FrameDesc {
        self.desc
    }

    /// Number of frames encoded since creation.
    pub const fn frames_encoded(&self) -> u64 {
        self.frames_encoded
    }

    /// Drops the reference frame; the next temporal frame is sent raw.
    pub fn reset(&mut self) {
        self.reference = None;
        self.temporal_run = 0;
    }

    /// Encodes the next frame.
    pub fn encode(&mut self, frame: &[u8]) -> CodecResult<Vec<u8>> {
        self.encode_with_stats(frame).map(|(bytes, _)| bytes)
    }

    /// Encodes the next frame, also returning how its bytes were coded.
    pub fn encode_with_stats(&mut self, frame: &[u8]) -> CodecResult<(Vec<u8>, DeltaStats)> {
        let key_due = self
            .key_frame_interval
            .is_some_and(|interval| self.temporal_run >= interval);
        let previous = if key_due {
            None
        } else {
            self.reference.as_deref()
        };
        let encoding = resolve_encoding(self.options.preferred, previous);
        let encoded = encode_frame_with_stats(frame, previous, self.desc, &self.options)?;

        if encoding == Encoding::TemporalDiff {
            self.temporal_run += 1;
        } else {
            self.temporal_run = 0;
        }
        match &mut self.reference {
            Some(reference) => reference.copy_from_slice(frame),
            None => self.reference = Some(frame.to_vec()),
        }
        self.frames_encoded += 1;

        tracing::trace!(
            frame = self.frames_encoded,
            %encoding,
            key_due,
            bytes = encoded.0.len(),
            "session frame encoded"
        );
        Ok(encoded)
    }
}

/// Decodes a stream of frames, supplying the last decoded frame as the
/// temporal reference.
#[derive(Debug)]
pub struct DecoderSession {
    limits: CodecLimits,
    reference_desc: Option<FrameDesc>,
    reference: Vec<u8>,
    frames_decoded: u64,
}

impl DecoderSession {
    /// Creates a session with no reference frame.
    #[must_use]
    pub const fn new(limits: CodecLimits) -> Self {
        Self {
            limits,
            reference_desc: None,
            reference: Vec::new(),
            frames_decoded: 0,
        }
    }

    /// Layout of the current reference frame, if any.
    pub const fn reference_desc(&self) -> Option<FrameDesc> {
        self.reference_desc
    }

    /// Number of frames decoded since creation.
    pub const fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Drops the reference frame.
    pub fn reset(&mut self) {
        self.reference_desc = None;
        self.reference.clear();
    }

    /// Decodes the next frame and returns its pixels.
    ///
    /// On error the session keeps its previous reference frame.
    pub fn decode(&mut self, bytes: &[u8]) -> CodecResult<(FrameHeader, &[u8])> {
        let header = peek_header(bytes, &self.limits)?;
        let desc = FrameDesc::from(&header);
        let previous = match self.reference_desc {
            Some(reference_desc) if reference_desc == desc => Some(self.reference.as_slice()),
            Some(_) if header.encoding.needs_reference() => {
                tracing::debug!(?desc, "temporal frame does not match reference layout");
                return Err(CodecError::MissingReferenceFrame);
            }
            _ => None,
        };

        let decoded = decode_frame(bytes, previous, &self.limits)?;
        self.reference = decoded.pixels;
        self.reference_desc = Some(desc);
        self.frames_decoded += 1;
        Ok((header, &self.reference))
    }
}
