//! Low-level bit packing primitives for the framedelta codec.
//!
//! This crate provides [`BitWriter`] and [`BitReader`] for bit-level encoding and decoding.
//! It is designed for bounded, panic-free operation with explicit error handling.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads/writes are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about pixels, frames, or deltas.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! Values are packed most-significant-bit first. Bit-packed runs are scoped
//! with [`BitWriter::bit_region`] / [`BitReader::bit_region`]; the region
//! guards restore byte alignment when dropped.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitWriter, BitReader};
//!
//! let mut writer = BitWriter::new();
//! writer.write_u32_aligned(2).unwrap();
//! {
//!     let mut region = writer.bit_region();
//!     region.write_bits(9, 4).unwrap();
//!     region.write_bits(15, 4).unwrap();
//! }
//!
//! let bytes = writer.finish();
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_u32_aligned().unwrap(), 2);
//! let mut region = reader.bit_region();
//! assert_eq!(region.read_bits(4).unwrap(), 9);
//! assert_eq!(region.read_bits(4).unwrap(), 15);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{BitError, BitResult};
pub use reader::{BitReader, ReadRegion};
pub use writer::{BitWriter, WriteRegion};

/// Widest value accepted by `write_bits` / `read_bits`.
pub const MAX_BITS: u8 = 32;
