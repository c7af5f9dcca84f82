//! Prelinked firmware container detection and in-place normalization.
//!
//! Some platform build pipelines wrap a single LZVN payload in a Mach-O fat
//! header and a "prelinked kernel" header:
//!
//! ```text
//! 0x000  fat header     magic CA FE BA BE, nfat_arch            (8 bytes)
//! 0x008  fat arch       cputype, cpusubtype, offset, size, align (20 bytes)
//! offset prelinked hdr  'comp', 'lzvn', adler32, raw size, compressed size,
//!                       prelink version, reserved[10], platform[64], root[256]
//! +0x180 payload        `compressed size` bytes of LZVN
//! ```
//!
//! Every multi-byte field is big-endian.  [`normalize`] rewrites such a
//! buffer in place into a plain `bvxn` + payload + `bvx$` stream so the block
//! decoder never sees the wrapper.  Anything that does not match, or whose
//! declared offsets do not fit in the buffer, is left untouched.

use crate::block::types::{
    read_be32, write_le32, BlockHeader, ENDOFSTREAM_BLOCK_MAGIC, ENDOFSTREAM_HEADER_SIZE,
    LZVN_HEADER_SIZE,
};
use crate::displaylevel;

// ─────────────────────────────────────────────────────────────────────────────
// Layout constants
// ─────────────────────────────────────────────────────────────────────────────

/// Fat header magic as it appears on the wire.
pub const FAT_MAGIC_BYTES: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];
/// Fat header magic read as a big-endian word.
pub const FAT_MAGIC: u32 = 0xCAFE_BABE;
/// `comp`
pub const COMP_SIGNATURE: u32 = 0x636F_6D70;
/// `lzvn`
pub const LZVN_COMPRESS_TYPE: u32 = 0x6C7A_766E;
/// `lzss`; recognized for reporting only.
pub const LZSS_COMPRESS_TYPE: u32 = 0x6C7A_7373;

pub const FAT_HEADER_SIZE: usize = 8;
pub const FAT_ARCH_SIZE: usize = 20;
pub const PRELINKED_HEADER_SIZE: usize = 384;

const PLATFORM_NAME_SIZE: usize = 64;
const ROOT_PATH_SIZE: usize = 256;
const PLATFORM_NAME_OFFSET: usize = 64;
const ROOT_PATH_OFFSET: usize = PLATFORM_NAME_OFFSET + PLATFORM_NAME_SIZE;

// ─────────────────────────────────────────────────────────────────────────────
// Header value objects
// ─────────────────────────────────────────────────────────────────────────────

/// Outer fat header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatHeader {
    pub magic: u32,
    pub nfat_arch: u32,
}

impl FatHeader {
    pub fn decode(src: &[u8]) -> Option<FatHeader> {
        if src.len() < FAT_HEADER_SIZE {
            return None;
        }
        Some(FatHeader { magic: read_be32(src, 0), nfat_arch: read_be32(src, 4) })
    }
}

/// One architecture descriptor of a fat file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatArch {
    pub cputype: u32,
    pub cpusubtype: u32,
    pub offset: u32,
    pub size: u32,
    pub align: u32,
}

impl FatArch {
    pub fn decode(src: &[u8]) -> Option<FatArch> {
        if src.len() < FAT_ARCH_SIZE {
            return None;
        }
        Some(FatArch {
            cputype: read_be32(src, 0),
            cpusubtype: read_be32(src, 4),
            offset: read_be32(src, 8),
            size: read_be32(src, 12),
            align: read_be32(src, 16),
        })
    }
}

/// The prelinked kernel header preceding the compressed payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrelinkedHeader {
    pub signature: u32,
    pub compress_type: u32,
    pub adler32: u32,
    pub uncompressed_size: u32,
    pub compressed_size: u32,
    pub prelink_version: u32,
    /// NUL-trimmed platform name.
    pub platform_name: Vec<u8>,
    /// NUL-trimmed root path.
    pub root_path: Vec<u8>,
}

impl PrelinkedHeader {
    pub fn decode(src: &[u8]) -> Option<PrelinkedHeader> {
        if src.len() < PRELINKED_HEADER_SIZE {
            return None;
        }
        Some(PrelinkedHeader {
            signature: read_be32(src, 0),
            compress_type: read_be32(src, 4),
            adler32: read_be32(src, 8),
            uncompressed_size: read_be32(src, 12),
            compressed_size: read_be32(src, 16),
            prelink_version: read_be32(src, 20),
            platform_name: trim_nul(&src[PLATFORM_NAME_OFFSET..PLATFORM_NAME_OFFSET + PLATFORM_NAME_SIZE]),
            root_path: trim_nul(&src[ROOT_PATH_OFFSET..ROOT_PATH_OFFSET + ROOT_PATH_SIZE]),
        })
    }

    /// `true` for the one variant [`normalize`] unwraps.
    pub fn is_lzvn(&self) -> bool {
        self.signature == COMP_SIGNATURE && self.compress_type == LZVN_COMPRESS_TYPE
    }
}

fn trim_nul(field: &[u8]) -> Vec<u8> {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    field[..end].to_vec()
}

/// A container located in a buffer, with the payload range already checked
/// against the buffer length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerInfo {
    pub fat: FatHeader,
    pub arch: FatArch,
    pub header: PrelinkedHeader,
    /// Offset of the prelinked header.
    pub header_offset: usize,
    /// Payload byte range within the buffer.
    pub payload: core::ops::Range<usize>,
}

/// Result of a successful [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedStream {
    /// Raw size declared by the container.
    pub raw_size: usize,
    /// Payload bytes moved behind the synthesized header.
    pub compressed_size: usize,
    /// Length of the plain stream now at the start of the buffer.
    pub stream_len: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Detection
// ─────────────────────────────────────────────────────────────────────────────

/// `true` when `src` starts with the fat header magic.
#[inline]
pub fn has_container_magic(src: &[u8]) -> bool {
    src.len() >= FAT_MAGIC_BYTES.len() && src[..4] == FAT_MAGIC_BYTES
}

/// Parse the container headers of `src` without modifying it.
///
/// Returns `None` unless the fat magic is present, the first arch entry and
/// the prelinked header both fit, and the declared payload lies within `src`.
/// Signature and compression type are not checked here; see
/// [`PrelinkedHeader::is_lzvn`].
pub fn probe(src: &[u8]) -> Option<ContainerInfo> {
    if !has_container_magic(src) {
        return None;
    }
    let fat = FatHeader::decode(src)?;
    let arch = FatArch::decode(src.get(FAT_HEADER_SIZE..FAT_HEADER_SIZE + FAT_ARCH_SIZE)?)?;

    let header_offset = arch.offset as usize;
    let header_end = header_offset.checked_add(PRELINKED_HEADER_SIZE)?;
    let header = PrelinkedHeader::decode(src.get(header_offset..header_end)?)?;

    let payload_end = header_end.checked_add(header.compressed_size as usize)?;
    if payload_end > src.len() {
        return None;
    }

    Some(ContainerInfo { fat, arch, header, header_offset, payload: header_end..payload_end })
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Rewrite a prelinked LZVN container at the start of `src` into a plain
/// single-block stream, in place.
///
/// On success the buffer holds `bvxn` header, payload, `bvx$`, then zeroes
/// up to `src.len()`.  Returns `None`, with `src` untouched, when the buffer
/// is not such a container or its declared layout does not fit.
pub fn normalize(src: &mut [u8]) -> Option<NormalizedStream> {
    if !has_container_magic(src) {
        return None;
    }
    let info = match probe(src) {
        Some(info) => info,
        None => {
            displaylevel!(4, "container: layout does not fit in {} bytes, left as is\n", src.len());
            return None;
        }
    };
    if !info.header.is_lzvn() {
        displaylevel!(
            4,
            "container: signature 0x{:08x} / type 0x{:08x} not handled, left as is\n",
            info.header.signature,
            info.header.compress_type
        );
        return None;
    }

    let compressed_size = info.payload.len();
    let payload_dst = LZVN_HEADER_SIZE;
    let eos_at = payload_dst + compressed_size;
    let stream_len = eos_at + ENDOFSTREAM_HEADER_SIZE;
    // The payload always starts past the synthesized header, so this only
    // fails for a payload ending within the last bytes of the buffer.
    if stream_len > src.len() || info.payload.start < payload_dst {
        displaylevel!(4, "container: no room for end-of-stream marker, left as is\n");
        return None;
    }

    BlockHeader::Lzvn {
        n_raw_bytes: info.header.uncompressed_size,
        n_payload_bytes: info.header.compressed_size,
    }
    .encode(src);
    src.copy_within(info.payload.clone(), payload_dst);
    src[eos_at..].fill(0);
    write_le32(src, eos_at, ENDOFSTREAM_BLOCK_MAGIC);

    displaylevel!(
        4,
        "container: unwrapped lzvn payload of {} bytes ({} raw) from offset {}\n",
        compressed_size,
        info.header.uncompressed_size,
        info.payload.start
    );

    Some(NormalizedStream {
        raw_size: info.header.uncompressed_size as usize,
        compressed_size,
        stream_len,
    })
}
