#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes behind a fat magic, so the container path is reached
// on nearly every input.
fuzz_target!(|data: &[u8]| {
    let mut src = vec![0xCA, 0xFE, 0xBA, 0xBE];
    src.extend_from_slice(data);

    let mut probe_src = src.clone();
    if let Some(stream) = lzfse::container::normalize(&mut probe_src) {
        assert!(stream.stream_len <= probe_src.len());
        assert_eq!(&probe_src[..4], b"bvxn");
    } else {
        assert_eq!(probe_src, src);
    }

    let mut dst = vec![0u8; 1 << 16];
    let n = lzfse::decode_buffer(&mut dst, &mut src, None);
    assert!(n <= dst.len());
});
