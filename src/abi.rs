//! C-ABI shims: export the three buffer decode symbols.
//!
//! Enabled with:
//!   cargo build --release --features c-abi
//!
//! The produced `target/release/liblzfse.a` links in place of the C decoder
//! for callers that only use the buffer API.
//!
//! ```c
//! size_t lzfse_decode_scratch_size(void);
//! size_t lzfse_decode_buffer_with_scratch(uint8_t *dst, size_t dst_size,
//!                                         const uint8_t *src, size_t src_size,
//!                                         void *scratch);
//! size_t lzfse_decode_buffer(uint8_t *dst, size_t dst_size,
//!                            const uint8_t *src, size_t src_size,
//!                            void *scratch);
//! ```

use std::os::raw::c_void;
use std::{ptr, slice};

use crate::decode_api::decode_buffer_with_scratch;
use crate::state::{decode_scratch_size, DecoderState};

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Build a slice from a pointer/length pair, accepting `(NULL, 0)`.
#[inline(always)]
unsafe fn slice_mut<'a>(p: *mut u8, len: usize) -> Option<&'a mut [u8]> {
    if p.is_null() {
        return if len == 0 { Some(&mut []) } else { None };
    }
    Some(slice::from_raw_parts_mut(p, len))
}

// ─────────────────────────────────────────────────────────────────────────────
// lzfse_decode_scratch_size
// ─────────────────────────────────────────────────────────────────────────────
#[no_mangle]
pub extern "C" fn lzfse_decode_scratch_size() -> usize {
    decode_scratch_size()
}

// ─────────────────────────────────────────────────────────────────────────────
// lzfse_decode_buffer_with_scratch
//
// Returns number of bytes written to dst, or 0 on failure.
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
/// - `dst_buffer` is valid for `dst_size` bytes of writes.
/// - `src_buffer` is valid for `src_size` bytes of reads **and writes**: a
///   prelinked container is unwrapped in place, so the memory must not be
///   read-only even though the C prototype says `const`.
/// - `scratch_buffer` points to at least `lzfse_decode_scratch_size()`
///   writable bytes, suitably aligned (any `malloc` result is).
/// - None of the three regions overlap.
#[no_mangle]
pub unsafe extern "C" fn lzfse_decode_buffer_with_scratch(
    dst_buffer: *mut u8,
    dst_size: usize,
    src_buffer: *const u8,
    src_size: usize,
    scratch_buffer: *mut c_void,
) -> usize {
    let state = scratch_buffer as *mut DecoderState;
    if state.is_null() || (state as usize) % core::mem::align_of::<DecoderState>() != 0 {
        return 0;
    }
    let (dst, src) = match (slice_mut(dst_buffer, dst_size), slice_mut(src_buffer as *mut u8, src_size)) {
        (Some(d), Some(s)) => (d, s),
        _ => return 0,
    };
    // The scratch bytes are uninitialized from Rust's point of view.
    ptr::write(state, DecoderState::new());
    decode_buffer_with_scratch(dst, src, &mut *state)
}

// ─────────────────────────────────────────────────────────────────────────────
// lzfse_decode_buffer
//
// Same as above; `scratch_buffer` may be NULL, in which case the scratch is
// allocated with malloc and released before returning.
// ─────────────────────────────────────────────────────────────────────────────

/// # Safety
/// Same as [`lzfse_decode_buffer_with_scratch`], except `scratch_buffer` may
/// be NULL.
#[no_mangle]
pub unsafe extern "C" fn lzfse_decode_buffer(
    dst_buffer: *mut u8,
    dst_size: usize,
    src_buffer: *const u8,
    src_size: usize,
    scratch_buffer: *mut c_void,
) -> usize {
    if !scratch_buffer.is_null() {
        return lzfse_decode_buffer_with_scratch(dst_buffer, dst_size, src_buffer, src_size, scratch_buffer);
    }

    // +1 in case the scratch size is ever zero.
    let owned = libc::malloc(decode_scratch_size() + 1);
    if owned.is_null() {
        return 0;
    }
    let ret = lzfse_decode_buffer_with_scratch(dst_buffer, dst_size, src_buffer, src_size, owned);
    libc::free(owned);
    ret
}
