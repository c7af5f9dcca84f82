//! Block-stream decoding.
//!
//! A stream is a sequence of blocks, each introduced by a four-byte magic
//! tag, terminated by the `bvx$` end-of-stream marker.

pub mod decode;
pub mod lzvn;
pub mod types;

// Re-export the most important public API items at the module level.
pub use decode::decode;
pub use lzvn::{lzvn_decode, LzvnState, Opcode};
pub use types::{
    BlockHeader, DecodeError, Progress, COMPRESSEDLZVN_BLOCK_MAGIC, COMPRESSEDV1_BLOCK_MAGIC,
    COMPRESSEDV2_BLOCK_MAGIC, ENDOFSTREAM_BLOCK_MAGIC, UNCOMPRESSED_BLOCK_MAGIC,
};
