// lzfse: buffer decoder for LZFSE block streams and prelinked LZVN containers

pub mod config;
pub mod cli;
pub mod block;
pub mod state;
pub mod container;
pub mod decode_api;
pub mod io;
#[cfg(feature = "c-abi")]
pub mod abi;

// ── Version constants ────────────────────────────────────────────────────────
pub const LZFSE_VERSION_MAJOR: u32 = 0;
pub const LZFSE_VERSION_MINOR: u32 = 3;
pub const LZFSE_VERSION_RELEASE: u32 = 0;
pub const LZFSE_VERSION_NUMBER: u32 =
    LZFSE_VERSION_MAJOR * 100 * 100 + LZFSE_VERSION_MINOR * 100 + LZFSE_VERSION_RELEASE;
pub const LZFSE_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the runtime version number.
pub fn version_number() -> u32 {
    LZFSE_VERSION_NUMBER
}

/// Returns the runtime version string.
pub fn version_string() -> &'static str {
    LZFSE_VERSION_STRING
}

// ── Top-level re-exports ─────────────────────────────────────────────────────
pub use block::types::DecodeError;
pub use decode_api::{decode_buffer, decode_buffer_with_scratch, decoded_size_hint};
pub use state::{decode_scratch_size, DecoderState};
