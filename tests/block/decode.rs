// Integration tests for block/decode.rs: the block-decode automaton driven
// directly over a DecoderState.

use lzfse::block::decode::decode;
use lzfse::block::types::{DecodeError, Progress, COMPRESSEDV2_BLOCK_MAGIC};
use lzfse::state::{BlockState, DecoderState};

use crate::common::{hello_payload, lzvn_block, lzvn_encode, raw_block, sample_text, stream, EOS};

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn run(src: &[u8], cap: usize) -> (Result<Progress, DecodeError>, Vec<u8>, DecoderState) {
    let mut st = DecoderState::new();
    let mut dst = vec![0u8; cap];
    st.init(dst.len(), src.len());
    let r = decode(&mut st, src, &mut dst);
    (r, dst, st)
}

// ─────────────────────────────────────────────────────────────────────────────
// Completion
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn empty_stream_completes() {
    let (r, _, st) = run(EOS, 0);
    assert_eq!(r, Ok(Progress::Completed));
    assert!(st.end_of_stream());
    assert_eq!(st.src_pos(), 4);
    assert_eq!(st.bytes_written(), 0);
}

#[test]
fn raw_block_completes() {
    let src = stream(&[raw_block(b"hello")]);
    let (r, dst, st) = run(&src, 8);
    assert_eq!(r, Ok(Progress::Completed));
    assert_eq!(st.bytes_written(), 5);
    assert_eq!(&dst[..5], b"hello");
}

#[test]
fn lzvn_block_completes() {
    let src = stream(&[lzvn_block(5, &hello_payload())]);
    let (r, dst, st) = run(&src, 5);
    assert_eq!(r, Ok(Progress::Completed));
    assert_eq!(&dst, b"hello");
    assert_eq!(st.src_pos(), src.len());
    assert_eq!(st.block(), BlockState::None);
}

#[test]
fn mixed_blocks_concatenate() {
    let tail = sample_text(700);
    let src = stream(&[
        raw_block(b"head:"),
        lzvn_block(tail.len(), &lzvn_encode(&tail)),
        raw_block(b":end"),
    ]);
    let (r, dst, st) = run(&src, 1024);
    assert_eq!(r, Ok(Progress::Completed));
    let n = st.bytes_written();
    let mut expected = b"head:".to_vec();
    expected.extend_from_slice(&tail);
    expected.extend_from_slice(b":end");
    assert_eq!(&dst[..n], &expected[..]);
}

#[test]
fn matches_may_reach_into_previous_blocks() {
    // Second block copies "abc" written by the first one.
    let src = stream(&[raw_block(b"abc"), lzvn_block(3, &[0x07, 0x03, 0x00, 0x06, 0, 0, 0, 0, 0, 0, 0])]);
    let (r, dst, _) = run(&src, 6);
    assert_eq!(r, Ok(Progress::Completed));
    assert_eq!(&dst, b"abcabc");
}

// ─────────────────────────────────────────────────────────────────────────────
// Destination full
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn raw_block_fills_destination() {
    let src = stream(&[raw_block(b"hello")]);
    let (r, dst, st) = run(&src, 3);
    assert_eq!(r, Ok(Progress::DstFull));
    assert_eq!(&dst, b"hel");
    assert_eq!(st.block(), BlockState::Uncompressed { n_raw_bytes: 2 });
}

#[test]
fn lzvn_block_fills_destination() {
    let src = stream(&[lzvn_block(5, &hello_payload())]);
    let (r, dst, _) = run(&src, 3);
    assert_eq!(r, Ok(Progress::DstFull));
    assert_eq!(&dst, b"hel");
}

#[test]
fn exact_fit_then_more_blocks_is_dst_full() {
    let src = stream(&[raw_block(b"abc"), raw_block(b"def")]);
    let (r, dst, _) = run(&src, 3);
    assert_eq!(r, Ok(Progress::DstFull));
    assert_eq!(&dst, b"abc");
}

#[test]
fn zero_length_destination_with_data_is_dst_full() {
    let src = stream(&[raw_block(b"x")]);
    let (r, _, _) = run(&src, 0);
    assert_eq!(r, Ok(Progress::DstFull));
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_end_of_stream_is_src_empty() {
    let src = raw_block(b"abc");
    let (r, dst, _) = run(&src, 8);
    assert_eq!(r, Err(DecodeError::SrcEmpty));
    assert_eq!(&dst[..3], b"abc");
}

#[test]
fn truncated_raw_block_is_src_empty() {
    let mut src = raw_block(b"abcdef");
    src.truncate(10);
    let (r, _, _) = run(&src, 8);
    assert_eq!(r, Err(DecodeError::SrcEmpty));
}

#[test]
fn truncated_lzvn_payload_is_src_empty() {
    let mut src = lzvn_block(5, &hello_payload());
    src.truncate(15);
    let (r, _, _) = run(&src, 8);
    assert_eq!(r, Err(DecodeError::SrcEmpty));
}

#[test]
fn unknown_magic_fails() {
    let (r, _, _) = run(b"junkjunk", 8);
    assert_eq!(r, Err(DecodeError::BadMagic(u32::from_le_bytes(*b"junk"))));
}

#[test]
fn fse_block_is_unsupported() {
    let (r, _, _) = run(b"bvx2\x00\x00\x00\x00", 8);
    assert_eq!(r, Err(DecodeError::UnsupportedBlock(COMPRESSEDV2_BLOCK_MAGIC)));
}

#[test]
fn raw_size_larger_than_payload_output_is_inconsistent() {
    // Payload yields 5 bytes but the header promises 6.
    let src = stream(&[lzvn_block(6, &hello_payload())]);
    let (r, _, _) = run(&src, 16);
    assert_eq!(r, Err(DecodeError::InconsistentSizes));
}

#[test]
fn raw_size_smaller_than_payload_output_is_inconsistent() {
    let src = stream(&[lzvn_block(4, &hello_payload())]);
    let (r, _, _) = run(&src, 16);
    assert_eq!(r, Err(DecodeError::InconsistentSizes));
}

#[test]
fn bytes_after_lzvn_end_marker_are_inconsistent() {
    let mut payload = hello_payload();
    payload.push(0xE1);
    payload.push(b'!');
    let src = stream(&[lzvn_block(5, &payload)]);
    let (r, _, _) = run(&src, 16);
    assert_eq!(r, Err(DecodeError::InconsistentSizes));
}

#[test]
fn source_range_end_limits_decoding() {
    // The state's source end, not the slice length, bounds the walk.
    let src = stream(&[raw_block(b"abc")]);
    let mut st = DecoderState::new();
    let mut dst = vec![0u8; 8];
    st.init(dst.len(), src.len() - 4);
    assert_eq!(decode(&mut st, &src, &mut dst), Err(DecodeError::SrcEmpty));
}
