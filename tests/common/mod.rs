// Shared stream builders for the integration tests.
//
// Everything here produces byte images by hand so the decoder is checked
// against independently constructed input rather than its own output.

#![allow(dead_code)]

pub const EOS: &[u8] = b"bvx$";

/// LZVN end-of-stream instruction with its padding.
pub const LZVN_EOS: [u8; 8] = [0x06, 0, 0, 0, 0, 0, 0, 0];

// ─────────────────────────────────────────────────────────────────────────────
// Plain streams
// ─────────────────────────────────────────────────────────────────────────────

/// `bvx-` block holding `data`, without the end-of-stream marker.
pub fn raw_block(data: &[u8]) -> Vec<u8> {
    let mut out = b"bvx-".to_vec();
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    out
}

/// `bvxn` block with the given LZVN payload and declared raw size.
pub fn lzvn_block(raw_size: usize, payload: &[u8]) -> Vec<u8> {
    let mut out = b"bvxn".to_vec();
    out.extend_from_slice(&(raw_size as u32).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Concatenate blocks and terminate with `bvx$`.
pub fn stream(blocks: &[Vec<u8>]) -> Vec<u8> {
    let mut out: Vec<u8> = blocks.concat();
    out.extend_from_slice(EOS);
    out
}

/// Single `bvxn` block stream for `data`, encoded with [`lzvn_encode`].
pub fn lzvn_stream(data: &[u8]) -> Vec<u8> {
    stream(&[lzvn_block(data.len(), &lzvn_encode(data))])
}

/// `"hello"` as a literal run: small-literal opcode, five bytes, end of stream.
pub fn hello_payload() -> Vec<u8> {
    let mut p = vec![0xE5];
    p.extend_from_slice(b"hello");
    p.extend_from_slice(&LZVN_EOS);
    p
}

// ─────────────────────────────────────────────────────────────────────────────
// Minimal LZVN encoder
// ─────────────────────────────────────────────────────────────────────────────

fn emit_literals(out: &mut Vec<u8>, lits: &[u8]) {
    for chunk in lits.chunks(271) {
        if chunk.len() < 16 {
            out.push(0xE0 | chunk.len() as u8);
        } else {
            out.push(0xE0);
            out.push((chunk.len() - 16) as u8);
        }
        out.extend_from_slice(chunk);
    }
}

fn emit_match(out: &mut Vec<u8>, len: usize, dist: usize) {
    // Large-distance opcode with no literals carries the first 3..=10 bytes.
    let first = len.min(10);
    out.push((((first - 3) as u8) << 3) | 7);
    out.extend_from_slice(&(dist as u16).to_le_bytes());
    // Remaining bytes reuse the previous distance.
    let mut rest = len - first;
    while rest > 0 {
        let m = rest.min(271);
        if m < 16 {
            out.push(0xF0 | m as u8);
        } else {
            out.push(0xF0);
            out.push((m - 16) as u8);
        }
        rest -= m;
    }
}

fn longest_match(data: &[u8], i: usize) -> (usize, usize) {
    let mut best = (0, 0);
    for j in i.saturating_sub(4096)..i {
        let mut l = 0;
        while i + l < data.len() && data[j + l] == data[i + l] && l < 1024 {
            l += 1;
        }
        if l > best.0 {
            best = (l, i - j);
        }
    }
    best
}

/// Greedy brute-force LZVN encoder: literal runs, large-distance matches,
/// previous-distance match extensions.  Slow; test inputs only.
pub fn lzvn_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut lit_start = 0;
    let mut i = 0;
    while i < data.len() {
        let (len, dist) = longest_match(data, i);
        if len >= 3 {
            emit_literals(&mut out, &data[lit_start..i]);
            emit_match(&mut out, len, dist);
            i += len;
            lit_start = i;
        } else {
            i += 1;
        }
    }
    emit_literals(&mut out, &data[lit_start..]);
    out.extend_from_slice(&LZVN_EOS);
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Prelinked containers
// ─────────────────────────────────────────────────────────────────────────────

pub const PRELINKED_HEADER_SIZE: usize = 384;

/// Builder for a fat + prelinked container around one payload.
pub struct ContainerBuilder {
    pub arch_offset: usize,
    pub signature: [u8; 4],
    pub compress_type: [u8; 4],
    pub adler32: u32,
    pub raw_size: u32,
    pub platform: &'static [u8],
    pub trailing: usize,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self {
            arch_offset: 0x1000,
            signature: *b"comp",
            compress_type: *b"lzvn",
            adler32: 0xDEAD_BEEF,
            raw_size: 0,
            platform: b"PrelinkedKernel",
            trailing: 0,
        }
    }
}

impl ContainerBuilder {
    pub fn build(&self, payload: &[u8]) -> Vec<u8> {
        let off = self.arch_offset;
        let mut buf = vec![0u8; off + PRELINKED_HEADER_SIZE + payload.len() + self.trailing];
        let be = |buf: &mut Vec<u8>, at: usize, v: u32| buf[at..at + 4].copy_from_slice(&v.to_be_bytes());

        buf[..4].copy_from_slice(&[0xCA, 0xFE, 0xBA, 0xBE]);
        be(&mut buf, 4, 1); // nfat_arch
        be(&mut buf, 8, 0x0100_0007); // cputype x86_64
        be(&mut buf, 12, 3); // cpusubtype
        be(&mut buf, 16, off as u32);
        be(&mut buf, 20, (PRELINKED_HEADER_SIZE + payload.len()) as u32);
        be(&mut buf, 24, 0);

        buf[off..off + 4].copy_from_slice(&self.signature);
        buf[off + 4..off + 8].copy_from_slice(&self.compress_type);
        be(&mut buf, off + 8, self.adler32);
        be(&mut buf, off + 12, self.raw_size);
        be(&mut buf, off + 16, payload.len() as u32);
        be(&mut buf, off + 20, 1);
        buf[off + 64..off + 64 + self.platform.len()].copy_from_slice(self.platform);

        let p = off + PRELINKED_HEADER_SIZE;
        buf[p..p + payload.len()].copy_from_slice(payload);
        buf
    }
}

/// Well-formed LZVN container for `data`.
pub fn container_for(data: &[u8]) -> Vec<u8> {
    ContainerBuilder { raw_size: data.len() as u32, ..Default::default() }.build(&lzvn_encode(data))
}

/// Deterministic, moderately compressible sample text.
pub fn sample_text(len: usize) -> Vec<u8> {
    const WORDS: &[&str] = &["kernel", "cache", "prelink", "lzvn", "block", "stream", "decode", "fat"];
    let mut out = Vec::with_capacity(len + 16);
    let mut x: u32 = 0x1234_5678;
    while out.len() < len {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        out.extend_from_slice(WORDS[(x as usize) % WORDS.len()].as_bytes());
        out.push(if x & 0x10 == 0 { b' ' } else { b'\n' });
    }
    out.truncate(len);
    out
}
