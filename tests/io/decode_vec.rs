// Integration tests for io::decode_vec: in-memory decode with output sizing.
//
// Coverage:
//   - declared sizes (block sum, container raw size) are used directly
//   - declared sizes above the limit are refused before allocating
//   - undeclared sizes (FSE-free stream without end marker is an error;
//     the growth path is exercised with a small limit)
//   - failures surface as errors, empty streams decode to nothing

use lzfse::io::{decode_vec, DecodePrefs};

use super::common::{container_for, lzvn_stream, raw_block, sample_text, stream};

fn prefs(max: usize) -> DecodePrefs {
    DecodePrefs { max_output_size: max, ..Default::default() }
}

#[test]
fn decode_vec_plain_stream() {
    let text = sample_text(10_000);
    let out = decode_vec(&lzvn_stream(&text), &DecodePrefs::default()).unwrap();
    assert_eq!(out, text);
}

#[test]
fn decode_vec_multi_block() {
    let src = stream(&[raw_block(b"abc"), raw_block(b"def")]);
    assert_eq!(decode_vec(&src, &DecodePrefs::default()).unwrap(), b"abcdef");
}

#[test]
fn decode_vec_container() {
    let text = sample_text(7_000);
    let out = decode_vec(&container_for(&text), &DecodePrefs::default()).unwrap();
    assert_eq!(out, text);
}

#[test]
fn decode_vec_empty_stream() {
    assert!(decode_vec(b"bvx$", &DecodePrefs::default()).unwrap().is_empty());
}

#[test]
fn decode_vec_refuses_oversized_declaration() {
    let src = lzvn_stream(&sample_text(5_000));
    let err = decode_vec(&src, &prefs(4_999)).unwrap_err();
    assert!(err.to_string().contains("exceeds limit"), "{err}");
}

#[test]
fn decode_vec_garbage_fails() {
    assert!(decode_vec(b"definitely not lzfse", &DecodePrefs::default()).is_err());
}

#[test]
fn decode_vec_undeclared_size_hits_limit() {
    // No end-of-stream marker: the headers cannot be walked, so the growth
    // path runs; the decoder fills every buffer it is given until the limit.
    let src = raw_block(&sample_text(300));
    let err = decode_vec(&src, &prefs(100)).unwrap_err();
    assert!(err.to_string().contains("exceeds limit"), "{err}");
}

#[test]
fn decode_vec_undeclared_size_fails_when_truncated() {
    let src = raw_block(&sample_text(300));
    assert!(decode_vec(&src, &DecodePrefs::default()).is_err());
}
