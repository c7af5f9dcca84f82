//! Block-decode automaton.
//!
//! Walks the block stream from the state's current source position,
//! dispatching on each block header, until one of:
//!   - the end-of-stream block is consumed → `Ok(Progress::Completed)`
//!   - the destination range is full        → `Ok(Progress::DstFull)`
//!   - the stream is truncated or malformed → `Err(DecodeError)`
//!
//! Only the byte-oriented block kinds are decoded here; FSE-coded blocks are
//! reported as [`DecodeError::UnsupportedBlock`].

use super::lzvn::{lzvn_decode, LzvnState};
use super::types::{BlockHeader, DecodeError, Progress};
use crate::state::{BlockState, DecoderState};

/// Run the automaton over `src[..state.src_end]` into `dst[..state.dst_end]`.
///
/// `state` must have been bound to these buffers with
/// [`DecoderState::init`]; positions are advanced in place so the state
/// reflects exactly what was consumed and produced when this returns.
pub fn decode(
    state: &mut DecoderState,
    src: &[u8],
    dst: &mut [u8],
) -> Result<Progress, DecodeError> {
    let src_end = state.src_end.min(src.len());
    let dst_end = state.dst_end.min(dst.len());

    loop {
        match state.block {
            // ── Between blocks: read the next header ────────────────────────
            BlockState::None => {
                let header = BlockHeader::decode(&src[state.src..src_end])?;
                match header {
                    BlockHeader::EndOfStream => {
                        state.src += header.encoded_len();
                        state.end_of_stream = true;
                        return Ok(Progress::Completed);
                    }
                    BlockHeader::Uncompressed { n_raw_bytes } => {
                        state.src += header.encoded_len();
                        state.block = BlockState::Uncompressed { n_raw_bytes: n_raw_bytes as usize };
                    }
                    BlockHeader::Lzvn { n_raw_bytes, n_payload_bytes } => {
                        state.src += header.encoded_len();
                        state.block = BlockState::Lzvn {
                            n_raw_bytes: n_raw_bytes as usize,
                            n_payload_bytes: n_payload_bytes as usize,
                        };
                        state.lzvn = LzvnState::default();
                    }
                    BlockHeader::Fse { magic } => return Err(DecodeError::UnsupportedBlock(magic)),
                }
            }

            // ── Stored block: plain copy ────────────────────────────────────
            BlockState::Uncompressed { n_raw_bytes } => {
                let n = n_raw_bytes.min(src_end - state.src).min(dst_end - state.dst);
                dst[state.dst..state.dst + n].copy_from_slice(&src[state.src..state.src + n]);
                state.src += n;
                state.dst += n;

                let left = n_raw_bytes - n;
                if left == 0 {
                    state.block = BlockState::None;
                    continue;
                }
                state.block = BlockState::Uncompressed { n_raw_bytes: left };
                if state.dst == dst_end {
                    return Ok(Progress::DstFull);
                }
                return Err(DecodeError::SrcEmpty);
            }

            // ── LZVN block ──────────────────────────────────────────────────
            BlockState::Lzvn { n_raw_bytes, n_payload_bytes } => {
                let src_limit = state.src + n_payload_bytes.min(src_end - state.src);
                let dst_limit = state.dst + n_raw_bytes.min(dst_end - state.dst);
                let run = lzvn_decode(
                    &mut state.lzvn,
                    &src[state.src..src_limit],
                    &mut dst[..dst_limit],
                    state.dst,
                    state.dst_begin,
                )?;
                if run.src_used > n_payload_bytes || run.dst_used > n_raw_bytes {
                    return Err(DecodeError::InconsistentSizes);
                }
                state.src += run.src_used;
                state.dst += run.dst_used;

                let n_payload_bytes = n_payload_bytes - run.src_used;
                let n_raw_bytes = n_raw_bytes - run.dst_used;
                if n_payload_bytes == 0 && n_raw_bytes == 0 && state.lzvn.end_of_stream {
                    state.block = BlockState::None;
                    continue;
                }
                state.block = BlockState::Lzvn { n_raw_bytes, n_payload_bytes };

                if state.lzvn.end_of_stream {
                    // Payload ended early or carried bytes past its end marker.
                    return Err(DecodeError::InconsistentSizes);
                }
                if state.dst == dst_end {
                    return Ok(Progress::DstFull);
                }
                if n_raw_bytes == 0 || n_payload_bytes == 0 {
                    return Err(DecodeError::InconsistentSizes);
                }
                return Err(DecodeError::SrcEmpty);
            }
        }
    }
}
