//! Frame delta codec for framedelta.
//!
//! This is the main codec crate that ties together bitstream and wire to
//! encode raw pixel buffers as self-describing byte streams, and back.
//!
//! # Features
//!
//! - Raw frames, copied verbatim
//! - Temporal-diff frames, predicted from the previous frame
//! - Spatial-diff frames, predicted from the same channel one pixel earlier
//! - Optional zlib pass over the payload
//! - Encoder and decoder sessions that carry the reference frame
//!
//! # Example
//!
//! ```
//! use codec::{decode_frame, encode_frame, CodecLimits, EncodeOptions, Encoding, FrameDesc, PixelFormat};
//!
//! let desc = FrameDesc::new(2, 1, PixelFormat::L8);
//! let previous = [10u8, 200];
//! let current = [12u8, 100];
//!
//! let bytes = encode_frame(&current, Some(&previous), desc, &EncodeOptions::new(Encoding::TemporalDiff))?;
//! let decoded = decode_frame(&bytes, Some(&previous), &CodecLimits::default())?;
//! assert_eq!(decoded.pixels, current);
//! # Ok::<(), codec::CodecError>(())
//! ```
//!
//! # Design Principles
//!
//! - **Self-describing** - The header alone decides how a payload is decoded.
//! - **Bounded** - Every length read from the input is checked against limits.
//! - **Deterministic** - Same inputs and options produce the same bytes.

mod compress;
mod delta;
mod error;
mod frame;
mod limits;
mod session;
mod types;

pub use compress::MAX_COMPRESSION_LEVEL;
pub use delta::{CODE_BITS, ESCAPE_CODE, LITERAL_BITS, MAX_DELTA, MAX_SHIFT_DELTA};
pub use error::{CodecError, CodecResult, ErrorKind, LimitKind};
pub use frame::{
    decode_frame, decode_frame_into, encode_frame, encode_frame_with_stats, peek_header,
    resolve_encoding, DecodedFrame, EncodeOptions,
};
pub use limits::CodecLimits;
pub use session::{DecoderSession, EncoderSession};
pub use types::{DeltaStats, FrameDesc};
pub use wire::{Encoding, FrameHeader, Limits as WireLimits, PixelFormat};
