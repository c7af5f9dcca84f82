#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes through the buffer decoder: no panics, and the
    // returned count never exceeds the destination.
    for cap in [0usize, 16, 4096, data.len().saturating_mul(8).min(1 << 20)] {
        let mut src = data.to_vec();
        let mut dst = vec![0u8; cap];
        let n = lzfse::decode_buffer(&mut dst, &mut src, None);
        assert!(n <= cap);
    }
    let _ = lzfse::decoded_size_hint(data);
});
