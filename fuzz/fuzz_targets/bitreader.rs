#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 6;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bit();
            }
            1 => {
                // 0 and values above 32 must be rejected, not panic
                let bits = data[idx - 1] % 40;
                let _ = reader.read_bits(bits);
            }
            2 => reader.align_to_byte(),
            3 => {
                let _ = reader.read_u32_aligned();
            }
            4 => {
                let len = usize::from(data[idx - 1] % 16);
                let _ = reader.read_bytes_aligned(len);
            }
            _ => {
                let mut region = reader.bit_region();
                for _ in 0..(data[idx - 1] % 8) {
                    let _ = region.read_bits(4);
                }
            }
        }
    }
});
