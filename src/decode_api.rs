//! Public buffer decode API.
//!
//!   - [`decode_buffer_with_scratch`]: decode with a caller-owned state record
//!   - [`decode_buffer`]: decode, allocating the state when none is given
//!   - [`decoded_size_hint`]: read-only estimate of the decoded size
//!
//! # Result convention
//!
//! Both decode entry points return a byte count and never an error value:
//! `0` means failure (malformed stream, allocation failure) or an empty
//! result.  A destination that fills before the end of the stream is a
//! success returning the destination length; compare it with the expected
//! decoded size to detect truncation.
//!
//! The source buffer is `&mut` because a prelinked container is unwrapped
//! in place; do not rely on its contents after the call.

use crate::block::decode::decode;
use crate::block::types::{BlockHeader, Progress};
use crate::container;
use crate::displaylevel;
use crate::state::DecoderState;

// ─────────────────────────────────────────────────────────────────────────────
// Decode driver
// ─────────────────────────────────────────────────────────────────────────────

/// Decode `src` into `dst` using `scratch` as working state.
///
/// Returns the number of bytes written into `dst`, or `0` on failure.
pub fn decode_buffer_with_scratch(
    dst: &mut [u8],
    src: &mut [u8],
    scratch: &mut DecoderState,
) -> usize {
    let mut dst_size = dst.len();
    scratch.init(dst_size, src.len());

    if let Some(normalized) = container::normalize(src) {
        dst_size = normalized.raw_size.min(dst.len());
        scratch.rebind(dst_size, src.len());
    }

    match decode(scratch, src, dst) {
        Ok(Progress::DstFull) => dst_size,
        Ok(Progress::Completed) => scratch.bytes_written(),
        Err(e) => {
            displaylevel!(
                4,
                "decode failed at source offset {}: {}\n",
                scratch.src_pos(),
                e
            );
            0
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scratch-owning entry point
// ─────────────────────────────────────────────────────────────────────────────

/// Decode `src` into `dst`.
///
/// When `scratch` is `None` a state record is allocated for the duration of
/// the call; if that allocation fails the call returns `0`.  A supplied
/// record is only borrowed.
pub fn decode_buffer(
    dst: &mut [u8],
    src: &mut [u8],
    scratch: Option<&mut DecoderState>,
) -> usize {
    match scratch {
        Some(state) => decode_buffer_with_scratch(dst, src, state),
        None => {
            let mut owned: Vec<DecoderState> = Vec::new();
            if owned.try_reserve_exact(1).is_err() {
                displaylevel!(
                    4,
                    "decode: cannot allocate {} bytes of scratch\n",
                    crate::decode_scratch_size()
                );
                return 0;
            }
            owned.push(DecoderState::new());
            decode_buffer_with_scratch(dst, src, &mut owned[0])
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Size probing
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded size of `src` as declared by its headers, without decoding.
///
/// For a prelinked LZVN container this is the container's raw size.  For a
/// plain stream it is the sum of the raw sizes of all blocks up to the
/// end-of-stream marker.  Returns `None` when the headers cannot be walked:
/// FSE-coded blocks, unknown magic, or truncation.
pub fn decoded_size_hint(src: &[u8]) -> Option<usize> {
    if let Some(info) = container::probe(src) {
        if info.header.is_lzvn() {
            return Some(info.header.uncompressed_size as usize);
        }
    }

    let mut pos = 0usize;
    let mut total = 0usize;
    loop {
        let header = BlockHeader::decode(src.get(pos..)?).ok()?;
        if header == BlockHeader::EndOfStream {
            return Some(total);
        }
        total = total.checked_add(header.n_raw_bytes()? as usize)?;
        pos = pos
            .checked_add(header.encoded_len())?
            .checked_add(header.body_len()?)?;
    }
}
