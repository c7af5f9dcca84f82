//! LZVN payload decoder.
//!
//! LZVN is a byte-oriented LZ77 encoding: every instruction starts with one
//! opcode byte selecting a literal run, a match, or both (literals first).
//! Literal bytes follow the opcode bytes directly in the payload.
//!
//! # Opcode map
//!
//! | Opcode byte                                   | Class              | Length |
//! |-----------------------------------------------|--------------------|--------|
//! | `0x06`                                        | end of stream      | 8      |
//! | `0x0E`, `0x16`                                | nop                | 1      |
//! | `0x1E`..`0x3E` step 8, `0x70-0x7F`, `0xD0-0xDF` | undefined        | -      |
//! | `0xA0-0xBF`                                   | medium distance    | 3      |
//! | `0xE0` / `0xE1-0xEF`                          | large / small literal | 2 / 1 |
//! | `0xF0` / `0xF1-0xFF`                          | large / small match   | 2 / 1 |
//! | other, low bits `110`                         | previous distance  | 1      |
//! | other, low bits `111`                         | large distance     | 3      |
//! | other                                         | small distance     | 2      |
//!
//! The decoder never reads or writes outside the slices it is handed.  When
//! the destination fills in the middle of a literal run or match, the
//! remaining counts are kept in [`LzvnState`].

use super::types::{read_le16, DecodeError};

/// Size of the end-of-stream instruction: opcode plus seven padding bytes.
pub const LZVN_EOS_LEN: usize = 8;
/// End-of-stream opcode.
pub const LZVN_EOS_OPCODE: u8 = 0x06;

/// Instruction classes, selected by the first opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// `LLMMMDDD DDDDDDDD`: up to 3 literals, match 3..=10, 11-bit distance.
    SmallDistance,
    /// `101LLMMM DDDDDDMM DDDDDDDD`: up to 3 literals, match 3..=34, 14-bit distance.
    MediumDistance,
    /// `LLMMM111 DDDDDDDD DDDDDDDD`: up to 3 literals, match 3..=10, 16-bit distance.
    LargeDistance,
    /// `LLMMM110`: up to 3 literals, match 3..=10, previous distance.
    PreviousDistance,
    /// `1110LLLL`: 1..=15 literals.
    SmallLiteral,
    /// `11100000 LLLLLLLL`: 16..=271 literals.
    LargeLiteral,
    /// `1111MMMM`: match 1..=15, previous distance.
    SmallMatch,
    /// `11110000 MMMMMMMM`: match 16..=271, previous distance.
    LargeMatch,
    EndOfStream,
    Nop,
    Undefined,
}

impl Opcode {
    /// Classify an opcode byte.
    pub fn classify(opc: u8) -> Opcode {
        match opc {
            LZVN_EOS_OPCODE => Opcode::EndOfStream,
            0x0E | 0x16 => Opcode::Nop,
            0x1E | 0x26 | 0x2E | 0x36 | 0x3E => Opcode::Undefined,
            0x70..=0x7F | 0xD0..=0xDF => Opcode::Undefined,
            0xA0..=0xBF => Opcode::MediumDistance,
            0xE0 => Opcode::LargeLiteral,
            0xE1..=0xEF => Opcode::SmallLiteral,
            0xF0 => Opcode::LargeMatch,
            0xF1..=0xFF => Opcode::SmallMatch,
            _ => match opc & 7 {
                6 => Opcode::PreviousDistance,
                7 => Opcode::LargeDistance,
                _ => Opcode::SmallDistance,
            },
        }
    }

    /// Number of opcode bytes, literals excluded.
    pub fn len(self) -> usize {
        match self {
            Opcode::SmallDistance | Opcode::LargeLiteral | Opcode::LargeMatch => 2,
            Opcode::MediumDistance | Opcode::LargeDistance => 3,
            Opcode::EndOfStream => LZVN_EOS_LEN,
            Opcode::PreviousDistance
            | Opcode::SmallLiteral
            | Opcode::SmallMatch
            | Opcode::Nop
            | Opcode::Undefined => 1,
        }
    }
}

/// Resumable LZVN decoder state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LzvnState {
    /// Literal bytes still to copy from the payload.
    pub l: usize,
    /// Match bytes still to copy from the destination.
    pub m: usize,
    /// Distance of the pending match.
    pub d: usize,
    /// Distance reused by the previous-distance opcodes.
    pub d_prev: usize,
    /// Set once the end-of-stream instruction has been consumed.
    pub end_of_stream: bool,
}

/// Bytes consumed and produced by one [`lzvn_decode`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LzvnRun {
    pub src_used: usize,
    pub dst_used: usize,
}

/// Decode LZVN instructions from `src` into `dst`, starting at `dst_pos`.
///
/// `src` holds the payload bytes still available for the current block and
/// `dst` ends at the block's output limit.  Matches may reach back to
/// `dst_begin`.  Returns when the source or destination is exhausted, or
/// after the end-of-stream instruction (`state.end_of_stream` is then set).
///
/// An instruction whose opcode bytes are not all present is left unconsumed.
pub fn lzvn_decode(
    state: &mut LzvnState,
    src: &[u8],
    dst: &mut [u8],
    dst_pos: usize,
    dst_begin: usize,
) -> Result<LzvnRun, DecodeError> {
    let mut ip = 0usize;
    let mut op = dst_pos;

    loop {
        // ── Pending literals ────────────────────────────────────────────────
        if state.l > 0 {
            let n = state.l.min(src.len() - ip).min(dst.len() - op);
            dst[op..op + n].copy_from_slice(&src[ip..ip + n]);
            ip += n;
            op += n;
            state.l -= n;
            if state.l > 0 {
                break;
            }
        }

        // ── Pending match ───────────────────────────────────────────────────
        if state.m > 0 {
            let d = state.d;
            if d == 0 || d > op - dst_begin {
                return Err(DecodeError::InvalidMatchDistance);
            }
            let n = state.m.min(dst.len() - op);
            // Byte-wise: source and destination overlap whenever d < n.
            for i in op..op + n {
                dst[i] = dst[i - d];
            }
            op += n;
            state.m -= n;
            if state.m > 0 {
                break;
            }
        }

        // ── Next instruction ────────────────────────────────────────────────
        if ip >= src.len() {
            break;
        }
        let opc = src[ip];
        let kind = Opcode::classify(opc);
        let len = kind.len();
        if src.len() - ip < len {
            // Instruction truncated; leave it for the caller to diagnose.
            break;
        }
        let b1 = if len > 1 { src[ip + 1] } else { 0 };
        let opc_l = (opc >> 6) as usize;
        let opc_m = ((opc >> 3) & 7) as usize + 3;

        match kind {
            Opcode::SmallDistance => {
                state.l = opc_l;
                state.m = opc_m;
                state.d = (((opc & 7) as usize) << 8) | b1 as usize;
                state.d_prev = state.d;
            }
            Opcode::MediumDistance => {
                state.l = ((opc >> 3) & 3) as usize;
                state.m = ((((opc & 7) as usize) << 2) | (b1 & 3) as usize) + 3;
                state.d = (read_le16(src, ip + 1) >> 2) as usize;
                state.d_prev = state.d;
            }
            Opcode::LargeDistance => {
                state.l = opc_l;
                state.m = opc_m;
                state.d = read_le16(src, ip + 1) as usize;
                state.d_prev = state.d;
            }
            Opcode::PreviousDistance => {
                state.l = opc_l;
                state.m = opc_m;
                state.d = state.d_prev;
            }
            Opcode::SmallLiteral => state.l = (opc & 0x0F) as usize,
            Opcode::LargeLiteral => state.l = b1 as usize + 16,
            Opcode::SmallMatch => {
                state.m = (opc & 0x0F) as usize;
                state.d = state.d_prev;
            }
            Opcode::LargeMatch => {
                state.m = b1 as usize + 16;
                state.d = state.d_prev;
            }
            Opcode::EndOfStream => {
                ip += len;
                state.end_of_stream = true;
                break;
            }
            Opcode::Nop => {}
            Opcode::Undefined => return Err(DecodeError::InvalidOpcode(opc)),
        }
        ip += len;
    }

    Ok(LzvnRun { src_used: ip, dst_used: op - dst_pos })
}
