//! Bit-level utilities shared by every other module.
//!
//! A bitboard is a 64-bit integer where each bit represents a square on the chess board.
//! Square indexing: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63
//! This corresponds to: square_index = (rank - 1) * 8 + (file - 1) where rank/file are 1-indexed.

use itertools::Itertools;
use rand::Rng;

/// Convert a 1-indexed rank and file to a square index (0-63)
///
/// Both must be in 1..=8. A zero rank or file underflows.
#[inline(always)]
pub const fn pos_to_sq(rank: u8, file: u8) -> u8 {
    (rank - 1) * 8 + (file - 1)
}

/// Convert a square index to a bitboard with that single bit set
#[inline(always)]
pub const fn sq_to_bb(sq: u8) -> u64 {
    1u64 << sq
}

/// Get the rank (1-8) from a square index
#[inline(always)]
pub const fn sq_rank(sq: u8) -> u8 {
    (sq >> 3) + 1
}

/// Get the file (1-8) from a square index
#[inline(always)]
pub const fn sq_file(sq: u8) -> u8 {
    (sq & 7) + 1
}

pub fn sq_to_algebraic(sq: u8) -> String {
    format!(
        "{}{}",
        (b'a' + sq_file(sq) - 1) as char,
        (b'0' + sq_rank(sq)) as char
    )
}

/// Parse a square like `e4`. Returns `None` for anything else.
pub fn algebraic_to_sq(s: &str) -> Option<u8> {
    match s.as_bytes() {
        [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => Some(pos_to_sq(rank - b'0', file - b'a' + 1)),
        _ => None,
    }
}

// ============================================================================
// BIT SCANNING
// ============================================================================

const DEBRUIJN_64: u64 = 0x03f7_9d71_b4cb_0a89;

/// Maps the top 6 bits of `(bb ^ (bb - 1)) * DEBRUIJN_64` back to the bit position.
#[rustfmt::skip]
const DEBRUIJN_INDEX: [u8; 64] = [
    0, 47, 1, 56, 48, 27, 2, 60,
    57, 49, 41, 37, 28, 16, 3, 61,
    54, 58, 35, 52, 50, 42, 21, 44,
    38, 32, 29, 23, 17, 11, 4, 62,
    46, 55, 26, 59, 40, 36, 15, 53,
    34, 51, 20, 43, 31, 22, 10, 45,
    25, 39, 14, 33, 19, 30, 9, 24,
    13, 18, 8, 12, 7, 6, 5, 63,
];

/// Index of the least significant set bit.
///
/// `bb ^ (bb - 1)` keeps the lowest set bit and every bit below it; multiplied by a
/// de Bruijn sequence this leaves a unique 6-bit pattern in the top bits for each
/// possible position.
///
/// The result is meaningless for `bb == 0`, callers must check for an empty board first.
#[inline(always)]
pub const fn bit_scan_forward(bb: u64) -> u8 {
    let separated = bb ^ bb.wrapping_sub(1);
    DEBRUIJN_INDEX[(separated.wrapping_mul(DEBRUIJN_64) >> 58) as usize]
}

/// All set bit positions in ascending order.
pub fn active_bit_indices(mut bb: u64) -> Vec<u8> {
    let mut indices = Vec::with_capacity(bb.count_ones() as usize);
    while bb != 0 {
        let sq = bit_scan_forward(bb);
        indices.push(sq);
        bb &= bb - 1; // Clear the bit we just found
    }
    indices
}

/// Iterate over set bits in a bitboard, returning square indices
pub struct BitboardIter(pub u64);

impl Iterator for BitboardIter {
    type Item = u8;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let sq = bit_scan_forward(self.0);
            self.0 &= self.0 - 1; // Clear the lowest set bit
            Some(sq)
        }
    }
}

/// A random 64 bit number with only a few bits set.
///
/// Each bit survives the three ANDs with probability 1/8, which makes good magic
/// candidates far more likely than a uniform draw would.
pub fn random_sparse_u64<R: Rng + ?Sized>(rng: &mut R) -> u64 {
    rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>()
}

// ============================================================================
// FILE AND RANK MASKS
// ============================================================================

pub const FILE_A: usize = 0;
pub const FILE_B: usize = 1;
pub const FILE_C: usize = 2;
pub const FILE_D: usize = 3;
pub const FILE_E: usize = 4;
pub const FILE_F: usize = 5;
pub const FILE_G: usize = 6;
pub const FILE_H: usize = 7;

/// Masks that clear one file each. Index with `FILE_A`..`FILE_H`.
pub const CLEAR_FILE: [u64; 8] = [
    0xFEFE_FEFE_FEFE_FEFE,
    0xFDFD_FDFD_FDFD_FDFD,
    0xFBFB_FBFB_FBFB_FBFB,
    0xF7F7_F7F7_F7F7_F7F7,
    0xEFEF_EFEF_EFEF_EFEF,
    0xDFDF_DFDF_DFDF_DFDF,
    0xBFBF_BFBF_BFBF_BFBF,
    0x7F7F_7F7F_7F7F_7F7F,
];

/// Masks with all squares of one rank set, rank 1 first.
pub const RANK_MASKS: [u64; 8] = [
    0x0000_0000_0000_00FF,
    0x0000_0000_0000_FF00,
    0x0000_0000_00FF_0000,
    0x0000_0000_FF00_0000,
    0x0000_00FF_0000_0000,
    0x0000_FF00_0000_0000,
    0x00FF_0000_0000_0000,
    0xFF00_0000_0000_0000,
];

// ============================================================================
// ONE-STEP SHIFTS
// ============================================================================
//
// Post-shift masks: shift first, then remove the squares that wrapped around
// onto the opposite edge.

#[inline(always)]
pub const fn north_one(bb: u64) -> u64 {
    bb << 8
}

#[inline(always)]
pub const fn south_one(bb: u64) -> u64 {
    bb >> 8
}

#[inline(always)]
pub const fn east_one(bb: u64) -> u64 {
    (bb << 1) & CLEAR_FILE[FILE_A]
}

#[inline(always)]
pub const fn west_one(bb: u64) -> u64 {
    (bb >> 1) & CLEAR_FILE[FILE_H]
}

#[inline(always)]
pub const fn north_east_one(bb: u64) -> u64 {
    (bb << 9) & CLEAR_FILE[FILE_A]
}

#[inline(always)]
pub const fn north_west_one(bb: u64) -> u64 {
    (bb << 7) & CLEAR_FILE[FILE_H]
}

#[inline(always)]
pub const fn south_east_one(bb: u64) -> u64 {
    (bb >> 7) & CLEAR_FILE[FILE_A]
}

#[inline(always)]
pub const fn south_west_one(bb: u64) -> u64 {
    (bb >> 9) & CLEAR_FILE[FILE_H]
}

// ============================================================================
// TEXT RENDERING
// ============================================================================

/// 64 characters of '0'/'1'; character i is square i.
pub fn to_bit_string(bb: u64) -> String {
    (0..64)
        .map(|sq| if bb & sq_to_bb(sq) != 0 { '1' } else { '0' })
        .collect()
}

/// Render a bitboard as an 8x8 grid, rank 8 on the first line, files a-h left to right.
pub fn to_display_string(bb: u64) -> String {
    let bits = to_bit_string(bb);
    bits.as_bytes()
        .chunks(8)
        .rev()
        .map(|rank| String::from_utf8_lossy(rank).into_owned())
        .join("\n")
}

pub fn to_hex(bb: u64) -> String {
    format!("0x{:016X}", bb)
}

/// Named reference masks for checking the square mapping by eye.
pub const DIAGNOSTIC_CONSTANTS: [(&str, u64); 9] = [
    ("a-file", 0x0101_0101_0101_0101),
    ("h-file", 0x8080_8080_8080_8080),
    ("1st rank", 0x0000_0000_0000_00FF),
    ("8th rank", 0xFF00_0000_0000_0000),
    ("a1-h8 diagonal", 0x8040_2010_0804_0201),
    ("h1-a8 antidiagonal", 0x0102_0408_1020_4080),
    ("light squares", 0x55AA_55AA_55AA_55AA),
    ("dark squares", 0xAA55_AA55_AA55_AA55),
    ("4th rank", 0x0000_0000_FF00_0000),
];
