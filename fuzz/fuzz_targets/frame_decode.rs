#![no_main]

use codec::{decode_frame, CodecLimits, DecoderSession};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let limits = CodecLimits::for_testing();

    // First byte picks where the input is split into a reference and a stream.
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let split = usize::from(split).min(rest.len());
    let (previous, stream) = rest.split_at(split);

    let _ = decode_frame(stream, None, &limits);
    let _ = decode_frame(stream, Some(previous), &limits);

    // Feed the same bytes as a sequence of frames through a session.
    let mut session = DecoderSession::new(limits);
    for chunk in rest.chunks(64) {
        let _ = session.decode(chunk);
    }
});
