//! File-level decoding for the `lzfse` binary.
//!
//! Reads a whole input into memory, sizes the destination from the stream
//! headers when they declare it, decodes with [`decode_buffer`], and writes
//! the result.  When the decoded size is unknown the destination grows
//! geometrically up to [`DecodePrefs::max_output_size`].

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, bail, Context};

use crate::block::types::{BlockHeader, DecodeError};
use crate::cli::constants::{DECODED_EXTENSION, LZFSE_EXTENSION, MB};
use crate::config::{EXPANSION_RATIO_DEFAULT, MAX_OUTPUT_SIZE_DEFAULT, MIN_OUTPUT_CAPACITY};
use crate::container::{self, ContainerInfo};
use crate::decode_api::{decode_buffer, decoded_size_hint};
use crate::displaylevel;
use crate::state::DecoderState;

/// Name standing for stdin / stdout on the command line.
pub const STDIO_MARK: &str = "-";

// ─────────────────────────────────────────────────────────────────────────────
// Preferences
// ─────────────────────────────────────────────────────────────────────────────

/// Decoding preferences shared by every file of one invocation.
#[derive(Debug, Clone)]
pub struct DecodePrefs {
    /// Largest destination buffer ever allocated.
    pub max_output_size: usize,
    /// Replace existing output files.
    pub overwrite: bool,
}

impl Default for DecodePrefs {
    fn default() -> Self {
        Self { max_output_size: MAX_OUTPUT_SIZE_DEFAULT, overwrite: false }
    }
}

/// Where decoded bytes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    File(PathBuf),
    Stdout,
}

/// Outcome of decoding one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    pub input_size: u64,
    pub output_size: u64,
    /// The input was a prelinked container.
    pub container: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory decode
// ─────────────────────────────────────────────────────────────────────────────

/// Decode a complete compressed image held in memory.
///
/// `src` is copied before each attempt since decoding may rewrite it.
pub fn decode_vec(src: &[u8], prefs: &DecodePrefs) -> anyhow::Result<Vec<u8>> {
    let mut scratch = DecoderState::new();

    if let Some(size) = decoded_size_hint(src) {
        if size > prefs.max_output_size {
            bail!("declared decoded size {} exceeds limit of {} bytes", size, prefs.max_output_size);
        }
        let mut work = src.to_vec();
        let mut dst = vec![0u8; size];
        let n = decode_buffer(&mut dst, &mut work, Some(&mut scratch));
        if n == 0 && size > 0 {
            bail!("decode failed");
        }
        dst.truncate(n);
        return Ok(dst);
    }

    // Size unknown: grow until the decoder stops short of the buffer end.
    let mut capacity = src
        .len()
        .saturating_mul(EXPANSION_RATIO_DEFAULT)
        .max(MIN_OUTPUT_CAPACITY)
        .min(prefs.max_output_size);
    loop {
        let mut work = src.to_vec();
        let mut dst = vec![0u8; capacity];
        let n = decode_buffer(&mut dst, &mut work, Some(&mut scratch));
        if n == 0 {
            bail!("decode failed");
        }
        if n < capacity {
            dst.truncate(n);
            return Ok(dst);
        }
        if capacity >= prefs.max_output_size {
            bail!("decoded data exceeds limit of {} bytes", prefs.max_output_size);
        }
        displaylevel!(4, "destination of {} bytes filled, retrying larger\n", capacity);
        capacity = capacity.saturating_mul(2).min(prefs.max_output_size);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File decode
// ─────────────────────────────────────────────────────────────────────────────

/// Output name derived from an input name: `.lzfse` stripped, else `.out` appended.
pub fn default_output_name(input: &Path) -> PathBuf {
    let name = input.as_os_str().to_string_lossy();
    match name.strip_suffix(LZFSE_EXTENSION) {
        Some(stem) if !stem.is_empty() => PathBuf::from(stem),
        _ => PathBuf::from(format!("{}{}", name, DECODED_EXTENSION)),
    }
}

fn read_input(input: &Path) -> anyhow::Result<Vec<u8>> {
    if input.as_os_str() == STDIO_MARK {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    fs::read(input).with_context(|| format!("reading {}", input.display()))
}

fn write_output(output: &Output, data: &[u8], prefs: &DecodePrefs) -> anyhow::Result<()> {
    match output {
        Output::Stdout => {
            let mut out = std::io::stdout().lock();
            out.write_all(data).context("writing stdout")?;
            out.flush().context("flushing stdout")
        }
        Output::File(path) => {
            if !prefs.overwrite && path.exists() {
                return Err(anyhow!("{} already exists; use -f to overwrite", path.display()));
            }
            fs::write(path, data).with_context(|| format!("writing {}", path.display()))
        }
    }
}

/// Decode one input file (or stdin) to `output`.
pub fn decode_file(input: &Path, output: &Output, prefs: &DecodePrefs) -> anyhow::Result<DecodeReport> {
    let start = Instant::now();
    let src = read_input(input)?;
    let is_container = container::probe(&src).is_some_and(|c| c.header.is_lzvn());

    let decoded = decode_vec(&src, prefs).with_context(|| format!("{}", input.display()))?;
    write_output(output, &decoded, prefs)?;

    let elapsed = start.elapsed().as_secs_f64().max(1e-9);
    displaylevel!(
        2,
        "{:<30}: {} -> {} bytes{}\n",
        input.display(),
        src.len(),
        decoded.len(),
        if is_container { " (prelinked container)" } else { "" }
    );
    displaylevel!(
        4,
        "{}: {:.2} MB/s\n",
        input.display(),
        decoded.len() as f64 / MB as f64 / elapsed
    );

    Ok(DecodeReport {
        input_size: src.len() as u64,
        output_size: decoded.len() as u64,
        container: is_container,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream description (`--list`)
// ─────────────────────────────────────────────────────────────────────────────

/// Headers found in a compressed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamInfo {
    pub container: Option<ContainerInfo>,
    /// Plain-stream block headers in order, end-of-stream included.
    pub blocks: Vec<BlockHeader>,
    /// Why the block walk stopped before an end-of-stream marker, if it did.
    pub walk_error: Option<DecodeError>,
    pub decoded_size: Option<usize>,
}

/// Describe `src` without decoding it.
pub fn describe(src: &[u8]) -> StreamInfo {
    let container = container::probe(src);
    let mut blocks = Vec::new();
    let mut walk_error = None;

    if container.is_none() {
        let mut pos = 0usize;
        loop {
            match BlockHeader::decode(&src[pos.min(src.len())..]) {
                Ok(header) => {
                    blocks.push(header);
                    if header == BlockHeader::EndOfStream {
                        break;
                    }
                    match header.body_len() {
                        Some(body) => pos = pos.saturating_add(header.encoded_len()).saturating_add(body),
                        None => break,
                    }
                }
                Err(e) => {
                    walk_error = Some(e);
                    break;
                }
            }
        }
    }

    StreamInfo { container, blocks, walk_error, decoded_size: decoded_size_hint(src) }
}

fn fourcc(word: u32) -> String {
    word.to_be_bytes().iter().map(|&b| if b.is_ascii_graphic() { b as char } else { '.' }).collect()
}

/// Print [`describe`] output for one file to stdout.
pub fn list_file(input: &Path) -> anyhow::Result<StreamInfo> {
    let src = read_input(input)?;
    let info = describe(&src);

    crate::displayout!("{}:\n", input.display());
    if let Some(c) = &info.container {
        crate::displayout!(
            "  prelinked container: signature '{}', type '{}', arch offset {}\n",
            fourcc(c.header.signature),
            fourcc(c.header.compress_type),
            c.header_offset
        );
        crate::displayout!(
            "  adler32 0x{:08x}, raw {} bytes, compressed {} bytes, platform '{}'\n",
            c.header.adler32,
            c.header.uncompressed_size,
            c.header.compressed_size,
            String::from_utf8_lossy(&c.header.platform_name)
        );
    }
    for (i, b) in info.blocks.iter().enumerate() {
        crate::displayout!("  block {:>4}: {:?}\n", i, b);
    }
    if let Some(e) = &info.walk_error {
        crate::displayout!("  stopped: {}\n", e);
    }
    match info.decoded_size {
        Some(n) => crate::displayout!("  decoded size: {} bytes\n", n),
        None => crate::displayout!("  decoded size: unknown\n"),
    }
    Ok(info)
}
