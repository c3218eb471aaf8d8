//! Frame header, pixel format table and payload framing for the framedelta codec.
//!
//! This crate handles the binary wire format: the fixed frame header, the
//! pixel format and encoding tags, length-prefixed payload sections, and
//! limit enforcement. It does not know how pixels are delta-coded, only the
//! structure around them.
//!
//! # Design Principles
//!
//! - **Stable wire format** - Tags and field order never change.
//! - **Bounded decoding** - All sizes are validated against limits before allocation.
//! - **No codec knowledge** - This crate handles framing, not delta coding.
//!
//! See `WIRE_FORMAT.md` for the byte layout.

mod error;
mod format;
mod header;
mod limits;
mod payload;

pub use error::{DecodeError, EncodeError, LimitKind, WireResult};
pub use format::{Encoding, ParseNameError, PixelFormat};
pub use header::{decode_header, encode_header, frame_len, FrameHeader, HEADER_SIZE};
pub use limits::Limits;
pub use payload::{decode_payload, encode_payload, PAYLOAD_PREFIX_SIZE};

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn public_api_exports() {
        let _ = HEADER_SIZE;
        let _ = PAYLOAD_PREFIX_SIZE;
        let _ = Limits::default();
        let _ = PixelFormat::L8;
        let _ = Encoding::Raw;

        // Error types
        let _: WireResult<()> = Ok(());
    }

    #[test]
    fn header_size_constant_correct() {
        assert_eq!(
            HEADER_SIZE,
            size_of::<u32>() // encoding_tag
                + size_of::<u8>() // secondary_compress_flag
                + size_of::<u32>() // format_tag
                + size_of::<u32>() // width
                + size_of::<u32>() // height
        );
    }

    #[test]
    fn header_and_payload_compose() {
        let header = FrameHeader::new(Encoding::Raw, false, PixelFormat::L8, 2, 1);
        let mut buf = vec![0u8; HEADER_SIZE];
        encode_header(&header, &mut buf).unwrap();
        encode_payload(&[12, 100], &mut buf).unwrap();

        let decoded = decode_header(&buf, &Limits::default()).unwrap();
        assert_eq!(decoded, header);
        let (body, consumed) = decode_payload(&buf[HEADER_SIZE..], &Limits::default()).unwrap();
        assert_eq!(body, &[12, 100]);
        assert_eq!(HEADER_SIZE + consumed, buf.len());
    }
}
