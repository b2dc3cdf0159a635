//! Magic numbers for sliding piece attacks.
//!
//! For every square and slider there is a 64-bit constant such that
//! `(occupancy * magic) >> (64 - bits)`, with `occupancy` restricted to the relevant
//! mask and `bits` its population count, never sends two occupancies with
//! different attack sets to the same index. Occupancies that share an attack set
//! may collide freely.
//!
//! The shipped constants can be regenerated with [`MagicSearch`], a randomized
//! trial-and-error search over sparse candidates.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bitboard::random_sparse_u64;
use crate::error::MagicError;
use crate::occupancy::OccupancySet;
use crate::types::Slider;

/// Budget for a single square, counted in candidates that reach the full collision check.
pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

/// Candidates that leave fewer bits than this in the top byte of `mask * magic`
/// spread the occupancies too poorly to be worth a full check.
pub const MIN_TOP_BYTE_BITS: u32 = 6;

/// Random draws allowed per counted attempt, including the ones the pre-filter
/// throws away.
const DRAWS_PER_ATTEMPT: u64 = 256;

pub const ROOK_MAGICS: [u64; 64] = [
    0x0280_0184_4000_2210, 0x0840_1000_4000_2002, 0x8200_08A0_1200_8040, 0x8100_1810_0100_20B4,
    0x0D80_0608_0004_0080, 0x8200_1810_1106_0004, 0x0880_2080_1500_0200, 0x0A00_0044_0508_8026,
    0x0014_8000_2080_4002, 0x0102_0020_8045_0200, 0x0810_8030_0188_2000, 0x0041_0022_3002_8900,
    0x2809_0004_0800_1100, 0x1002_0010_0C08_4200, 0x4021_0084_0B00_3200, 0x4016_0004_8104_0042,
    0x0871_0600_2200_4082, 0x0440_8500_4000_6101, 0x0040_8080_1000_6000, 0x0808_0080_1000_3880,
    0x0004_0080_0438_0080, 0x1000_1801_0440_9020, 0x0408_8080_4100_0A00, 0x8040_0A00_0247_0084,
    0x8000_4002_8000_9221, 0x0204_5000_C008_2001, 0x0014_9004_8020_0084, 0x0011_0019_0024_1000,
    0x0000_0400_8008_0181, 0x4A42_0022_0008_0410, 0x4800_0B0C_0028_0610, 0x0004_1282_0000_C411,
    0x9040_0982_2380_0840, 0x0000_6001_4040_1002, 0x0020_0020_C100_1100, 0xC080_4800_8080_3000,
    0x0CC2_8018_0080_0400, 0x2002_0002_8080_2C00, 0x0206_001C_4200_0801, 0x1000_0283_4200_0407,
    0xA240_01C2_2488_8000, 0x0040_4000_2000_8080, 0x0102_0188_1042_0020, 0x2030_0163_00D1_0008,
    0x0805_4801_0015_0030, 0x0001_8400_0200_8080, 0xC002_000C_2802_0081, 0x0000_8080_450A_000C,
    0x0600_2040_0180_0880, 0x0005_0220_4001_8100, 0x4000_B000_A000_8080, 0x0881_0800_8410_0180,
    0x8000_80E1_0040_1002, 0x0101_8004_0002_0080, 0x4040_9102_1048_0400, 0x0008_0104_0081_4200,
    0x3119_8100_48A2_0052, 0x0440_1202_2081_0442, 0x1048_10A0_0045_0019, 0x8020_2030_0100_0825,
    0xC226_0020_0844_1002, 0x0641_0008_020C_000D, 0x0641_001A_0002_BC01, 0x0084_0828_4081_0402,
];

pub const BISHOP_MAGICS: [u64; 64] = [
    0x0002_0202_0202_0200, 0x0004_1002_0201_3228, 0x0008_020A_D208_010C, 0x2024_1C0A_8010_0801,
    0x0402_0210_0000_4C40, 0x0032_0270_1440_0344, 0x0000_4104_1040_0000, 0x8022_0101_1D30_0E10,
    0x0000_0404_0404_0400, 0x0000_0202_0202_0200, 0x0100_060C_0302_0000, 0x8020_020A_0202_02A4,
    0x1049_4110_4005_4001, 0x0200_4588_2008_1000, 0x0000_0041_0410_4000, 0x0000_0020_8208_2000,
    0x0208_0184_1010_0200, 0x0010_0020_0200_8900, 0x0009_0008_0641_0200, 0x0088_0200_820A_4020,
    0x0002_0084_0213_1012, 0x0A83_0002_0080_9400, 0xC015_000A_0690_9400, 0x0101_0801_4108_0100,
    0x9020_E002_5808_1100, 0x0003_A041_1006_0200, 0x0008_1402_4808_20A0, 0x1402_4800_0282_0040,
    0x0803_0100_0010_4000, 0x0448_0810_0080_4400, 0x4000_80A0_140A_0800, 0x0294_1101_1084_8182,
    0x8001_8808_0540_1000, 0x2024_03A4_0088_7000, 0x3208_2088_0010_00A0, 0x0086_0081_20B2_0200,
    0x0810_0082_0000_2200, 0x0906_1005_0202_0880, 0x2401_8404_0601_1101, 0x0A08_0841_1200_4902,
    0x0414_0420_08C0_0601, 0x1080_4404_2014_2500, 0x0106_0022_0800_0108, 0x0040_70C2_0083_480A,
    0x8100_6001_4040_0400, 0x0040_0321_1208_0100, 0x0010_A408_0041_1480, 0x0008_0914_0C88_0224,
    0x0404_0088_8490_8004, 0x0000_8203_1120_C000, 0x0018_5084_00A8_101A, 0x2054_0102_8404_0000,
    0x0408_00C0_8501_09A0, 0x0000_D202_1005_00D0, 0x200A_0808_0800_C100, 0x0002_9009_4208_8006,
    0x0004_2084_2088_4000, 0x0304_6021_0410_8410, 0xE008_0400_4144_5030, 0x0800_0408_3022_8800,
    0x110C_5004_40A9_2201, 0x8008_0120_0410_0084, 0x0002_9210_0148_0684, 0x0102_0202_082A_0081,
];

/// Table index of an occupancy that is already restricted to the relevant mask.
#[inline(always)]
pub fn magic_index(masked_occupancy: u64, magic: u64, bits: u32) -> usize {
    (masked_occupancy.wrapping_mul(magic) >> (64 - bits)) as usize
}

/// Check that `magic` hashes every occupancy variation of the square without a
/// harmful collision.
pub fn verify_magic(sq: u8, slider: Slider, magic: u64) -> bool {
    let set = OccupancySet::new(sq, slider);
    let mut seen = vec![0u64; 1 << set.bits()];
    for (occupied, attacks) in set.iter() {
        let idx = magic_index(occupied, magic, set.bits());
        // Slider attacks are never empty, so zero marks an unused slot
        if seen[idx] == 0 {
            seen[idx] = attacks;
        } else if seen[idx] != attacks {
            return false;
        }
    }
    true
}

/// A magic number found by the search, with the number of candidates it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicEntry {
    pub magic: u64,
    pub attempts: u64,
}

/// Randomized magic number search.
///
/// Holds its own RNG, so a seeded search is reproducible.
pub struct MagicSearch {
    rng: StdRng,
    max_attempts: u64,
    min_top_byte_bits: u32,
}

impl MagicSearch {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_top_byte_bits: MIN_TOP_BYTE_BITS,
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_top_byte_bits: MIN_TOP_BYTE_BITS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Pre-filter threshold. Anything above 8 rejects every candidate.
    pub fn with_min_top_byte_bits(mut self, bits: u32) -> Self {
        self.min_top_byte_bits = bits;
        self
    }

    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    /// Find a magic number for one square.
    pub fn find_magic(&mut self, sq: u8, slider: Slider) -> Result<MagicEntry, MagicError> {
        let set = OccupancySet::new(sq, slider);
        let bits = set.bits();
        let size = 1usize << bits;

        // Slots stamped with an older attempt number count as empty, which saves
        // clearing the table before every candidate.
        let mut used = vec![0u64; size];
        let mut epoch = vec![0u64; size];

        let max_draws = self.max_attempts.saturating_mul(DRAWS_PER_ATTEMPT);
        let mut attempts = 0u64;
        let mut draws = 0u64;
        while attempts < self.max_attempts && draws < max_draws {
            draws += 1;
            let magic = random_sparse_u64(&mut self.rng);
            if (set.mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones()
                < self.min_top_byte_bits
            {
                continue;
            }
            attempts += 1;

            let mut collision = false;
            for (occupied, attacks) in set.iter() {
                let idx = magic_index(occupied, magic, bits);
                if epoch[idx] < attempts {
                    epoch[idx] = attempts;
                    used[idx] = attacks;
                } else if used[idx] != attacks {
                    collision = true;
                    break;
                }
            }

            if !collision {
                debug!(
                    "{} magic for square {}: {:#018x} after {} attempts",
                    slider, sq, magic, attempts
                );
                return Ok(MagicEntry { magic, attempts });
            }
        }

        Err(MagicError::AttemptsExhausted {
            square: sq,
            slider,
            attempts,
        })
    }

    /// Find magic numbers for all 64 squares of one slider family.
    pub fn find_all(&mut self, slider: Slider) -> Result<[u64; 64], MagicError> {
        let mut magics = [0u64; 64];
        let mut total_attempts = 0u64;
        for sq in 0..64u8 {
            let entry = self.find_magic(sq, slider)?;
            magics[sq as usize] = entry.magic;
            total_attempts += entry.attempts;
        }
        info!("found 64 {} magics in {} attempts", slider, total_attempts);
        Ok(magics)
    }
}

/// Format magic numbers as a Rust array, ready to paste over the shipped tables.
pub fn format_magics(name: &str, magics: &[u64; 64]) -> String {
    let mut out = format!("pub const {}: [u64; 64] = [\n", name);
    for row in magics.chunks(4) {
        let line: Vec<String> = row.iter().map(|m| format!("{:#018X}", m)).collect();
        out.push_str(&format!("    {},\n", line.join(", ")));
    }
    out.push_str("];\n");
    out
}
