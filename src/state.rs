//! Decoder working state.
//!
//! One [`DecoderState`] is the scratch record of a single top-level decode
//! call.  It is reset at the start of every call and never carries anything
//! from one call to the next.  All positions are indices into the caller's
//! source and destination slices.

use crate::block::lzvn::LzvnState;

/// Block currently being decoded, with the counts still outstanding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockState {
    /// Between blocks; the next bytes are a block header.
    #[default]
    None,
    /// Inside a `bvx-` block.
    Uncompressed { n_raw_bytes: usize },
    /// Inside a `bvxn` block.
    Lzvn { n_raw_bytes: usize, n_payload_bytes: usize },
}

/// Working state of one decode call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderState {
    // Source range: read position within [src_begin, src_end).
    pub(crate) src: usize,
    pub(crate) src_begin: usize,
    pub(crate) src_end: usize,
    // Destination range: write position within [dst_begin, dst_end).
    pub(crate) dst: usize,
    pub(crate) dst_begin: usize,
    pub(crate) dst_end: usize,

    pub(crate) end_of_stream: bool,
    pub(crate) block: BlockState,
    pub(crate) lzvn: LzvnState,
}

impl DecoderState {
    /// A zeroed state, not yet bound to any buffers.
    pub const fn new() -> Self {
        Self {
            src: 0,
            src_begin: 0,
            src_end: 0,
            dst: 0,
            dst_begin: 0,
            dst_end: 0,
            end_of_stream: false,
            block: BlockState::None,
            lzvn: LzvnState { l: 0, m: 0, d: 0, d_prev: 0, end_of_stream: false },
        }
    }

    /// Reset the record and bind it to a destination of `dst_len` bytes and
    /// a source of `src_len` bytes, both positions at their range start.
    pub fn init(&mut self, dst_len: usize, src_len: usize) {
        *self = Self::new();
        self.src_end = self.src_begin + src_len;
        self.dst_end = self.dst_begin + dst_len;
    }

    /// Current read position in the source.
    pub fn src_pos(&self) -> usize {
        self.src
    }

    /// Source range `(begin, end)`.
    pub fn src_range(&self) -> (usize, usize) {
        (self.src_begin, self.src_end)
    }

    /// Current write position in the destination.
    pub fn dst_pos(&self) -> usize {
        self.dst
    }

    /// Destination range `(begin, end)`.
    pub fn dst_range(&self) -> (usize, usize) {
        (self.dst_begin, self.dst_end)
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.dst - self.dst_begin
    }

    /// `true` once the end-of-stream marker has been consumed.
    pub fn end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    /// Block being decoded when the automaton last returned.
    pub fn block(&self) -> BlockState {
        self.block
    }

    /// Shrink or grow the effective destination to `dst_len` bytes and the
    /// source to `src_len` bytes, keeping positions untouched.
    pub(crate) fn rebind(&mut self, dst_len: usize, src_len: usize) {
        self.src_end = self.src_begin + src_len;
        self.dst_end = self.dst_begin + dst_len;
    }
}

/// Returns the size in bytes of one decoder working state.
pub fn decode_scratch_size() -> usize {
    core::mem::size_of::<DecoderState>()
}
