//! Block-stream constants, byte-order helpers, block header codecs and the
//! status / error types shared by the block-decode automaton.
//!
//! Covers:
//!   - Block magic tags (`bvx$`, `bvx-`, `bvx1`, `bvx2`, `bvxn`)
//!   - Portable LE/BE `u32` read/write helpers over byte slices
//!   - [`BlockHeader`]: explicit field-level decode/encode of block headers
//!   - [`Progress`] / [`DecodeError`]: automaton outcomes

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Block magic tags (little-endian u32 of the four ASCII bytes)
// ─────────────────────────────────────────────────────────────────────────────

/// No block is currently being decoded.
pub const NO_BLOCK_MAGIC: u32 = 0x0000_0000;
/// `bvx$`: end of stream.
pub const ENDOFSTREAM_BLOCK_MAGIC: u32 = 0x2478_7662;
/// `bvx-`: raw bytes, stored uncompressed.
pub const UNCOMPRESSED_BLOCK_MAGIC: u32 = 0x2d78_7662;
/// `bvx1`: FSE-coded block, version 1 header.
pub const COMPRESSEDV1_BLOCK_MAGIC: u32 = 0x3178_7662;
/// `bvx2`: FSE-coded block, version 2 (packed) header.
pub const COMPRESSEDV2_BLOCK_MAGIC: u32 = 0x3278_7662;
/// `bvxn`: LZVN-coded block.
pub const COMPRESSEDLZVN_BLOCK_MAGIC: u32 = 0x6e78_7662;

/// Size of the `bvx$` marker.
pub const ENDOFSTREAM_HEADER_SIZE: usize = 4;
/// Size of a `bvx-` header: magic, raw byte count.
pub const UNCOMPRESSED_HEADER_SIZE: usize = 8;
/// Size of a `bvxn` header: magic, raw byte count, payload byte count.
pub const LZVN_HEADER_SIZE: usize = 12;

// ─────────────────────────────────────────────────────────────────────────────
// Byte-order helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u32` from `src` at byte `offset`.
///
/// Portable: no alignment or host-endianness assumptions.
#[inline]
pub fn read_le32(src: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        src[offset],
        src[offset + 1],
        src[offset + 2],
        src[offset + 3],
    ])
}

/// Write a little-endian `u32` into `dst` at byte `offset`.
#[inline]
pub fn write_le32(dst: &mut [u8], offset: usize, value: u32) {
    dst[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Read a big-endian `u32` from `src` at byte `offset`.
#[inline]
pub fn read_be32(src: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        src[offset],
        src[offset + 1],
        src[offset + 2],
        src[offset + 3],
    ])
}

/// Write a big-endian `u32` into `dst` at byte `offset`.
#[inline]
pub fn write_be32(dst: &mut [u8], offset: usize, value: u32) {
    dst[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Read a little-endian `u16` from `src` at byte `offset`.
#[inline]
pub fn read_le16(src: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([src[offset], src[offset + 1]])
}

// ─────────────────────────────────────────────────────────────────────────────
// Block headers
// ─────────────────────────────────────────────────────────────────────────────

/// A decoded block header.
///
/// Only the byte-oriented block kinds carry their sizes here; the FSE-coded
/// kinds are identified by magic alone since their headers are never walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockHeader {
    /// `bvx$`
    EndOfStream,
    /// `bvx-` followed by `n_raw_bytes` literal bytes.
    Uncompressed { n_raw_bytes: u32 },
    /// `bvxn` followed by `n_payload_bytes` of LZVN opcodes producing `n_raw_bytes`.
    Lzvn { n_raw_bytes: u32, n_payload_bytes: u32 },
    /// `bvx1` / `bvx2`; carries the magic that was seen.
    Fse { magic: u32 },
}

impl BlockHeader {
    /// Number of header bytes this block kind occupies on the wire.
    ///
    /// `Fse` reports only its magic; its full header length is never needed.
    pub fn encoded_len(&self) -> usize {
        match self {
            BlockHeader::EndOfStream | BlockHeader::Fse { .. } => ENDOFSTREAM_HEADER_SIZE,
            BlockHeader::Uncompressed { .. } => UNCOMPRESSED_HEADER_SIZE,
            BlockHeader::Lzvn { .. } => LZVN_HEADER_SIZE,
        }
    }

    /// Raw (decoded) byte count declared by the header, if it declares one.
    pub fn n_raw_bytes(&self) -> Option<u32> {
        match *self {
            BlockHeader::Uncompressed { n_raw_bytes } | BlockHeader::Lzvn { n_raw_bytes, .. } => {
                Some(n_raw_bytes)
            }
            _ => None,
        }
    }

    /// Bytes that follow the header before the next block begins.
    pub fn body_len(&self) -> Option<usize> {
        match *self {
            BlockHeader::EndOfStream => Some(0),
            BlockHeader::Uncompressed { n_raw_bytes } => Some(n_raw_bytes as usize),
            BlockHeader::Lzvn { n_payload_bytes, .. } => Some(n_payload_bytes as usize),
            BlockHeader::Fse { .. } => None,
        }
    }

    /// Decode the header found at the start of `src`.
    ///
    /// Returns `Err(DecodeError::SrcEmpty)` when `src` is too short to hold
    /// the full header, `BadMagic` for a tag outside the block family.
    pub fn decode(src: &[u8]) -> Result<BlockHeader, DecodeError> {
        if src.len() < ENDOFSTREAM_HEADER_SIZE {
            return Err(DecodeError::SrcEmpty);
        }
        let magic = read_le32(src, 0);
        match magic {
            ENDOFSTREAM_BLOCK_MAGIC => Ok(BlockHeader::EndOfStream),
            UNCOMPRESSED_BLOCK_MAGIC => {
                if src.len() < UNCOMPRESSED_HEADER_SIZE {
                    return Err(DecodeError::SrcEmpty);
                }
                Ok(BlockHeader::Uncompressed { n_raw_bytes: read_le32(src, 4) })
            }
            COMPRESSEDLZVN_BLOCK_MAGIC => {
                if src.len() < LZVN_HEADER_SIZE {
                    return Err(DecodeError::SrcEmpty);
                }
                Ok(BlockHeader::Lzvn {
                    n_raw_bytes: read_le32(src, 4),
                    n_payload_bytes: read_le32(src, 8),
                })
            }
            COMPRESSEDV1_BLOCK_MAGIC | COMPRESSEDV2_BLOCK_MAGIC => Ok(BlockHeader::Fse { magic }),
            other => Err(DecodeError::BadMagic(other)),
        }
    }

    /// Encode this header at the start of `dst`; returns the bytes written.
    ///
    /// Panics if `dst` is shorter than [`encoded_len`](Self::encoded_len).
    pub fn encode(&self, dst: &mut [u8]) -> usize {
        match *self {
            BlockHeader::EndOfStream => write_le32(dst, 0, ENDOFSTREAM_BLOCK_MAGIC),
            BlockHeader::Uncompressed { n_raw_bytes } => {
                write_le32(dst, 0, UNCOMPRESSED_BLOCK_MAGIC);
                write_le32(dst, 4, n_raw_bytes);
            }
            BlockHeader::Lzvn { n_raw_bytes, n_payload_bytes } => {
                write_le32(dst, 0, COMPRESSEDLZVN_BLOCK_MAGIC);
                write_le32(dst, 4, n_raw_bytes);
                write_le32(dst, 8, n_payload_bytes);
            }
            BlockHeader::Fse { magic } => write_le32(dst, 0, magic),
        }
        self.encoded_len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Automaton outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Successful terminal states of the block-decode automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The end-of-stream marker was reached.
    Completed,
    /// The destination range was filled before the end of the stream.
    DstFull,
}

/// Errors reported by the block-decode automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Source exhausted before the end-of-stream marker.
    SrcEmpty,
    /// A block started with a tag outside the block family.
    BadMagic(u32),
    /// An FSE-coded block (`bvx1`/`bvx2`); no decoder for it is built in.
    UnsupportedBlock(u32),
    /// An LZVN opcode from the reserved set.
    InvalidOpcode(u8),
    /// A match distance of zero or reaching before the destination start.
    InvalidMatchDistance,
    /// Block payload and raw counts disagree with what the payload produced.
    InconsistentSizes,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DecodeError::SrcEmpty => f.write_str("source truncated before end of stream"),
            DecodeError::BadMagic(m) => write!(f, "unknown block magic 0x{m:08x}"),
            DecodeError::UnsupportedBlock(m) => {
                write!(f, "unsupported block kind 0x{m:08x}")
            }
            DecodeError::InvalidOpcode(op) => write!(f, "invalid LZVN opcode 0x{op:02x}"),
            DecodeError::InvalidMatchDistance => f.write_str("invalid match distance"),
            DecodeError::InconsistentSizes => f.write_str("block sizes inconsistent with payload"),
        }
    }
}

impl std::error::Error for DecodeError {}
