//! Magic attack lookup tables.
//!
//! One table per slider family, indexed by `[square][magic index]`. Every square
//! gets a 4096-slot row, the largest index range any rook square needs, so both
//! families share the same flat layout. Slots that no occupancy hashes to stay
//! zero and are never read: lookups always go through the same mask and magic
//! that built the table.

use std::time::Instant;

use log::info;
use once_cell::sync::Lazy;

use crate::attack_set::RelevantMasks;
use crate::error::MagicError;
use crate::magic::{magic_index, MagicSearch, BISHOP_MAGICS, DEFAULT_MAX_ATTEMPTS, ROOK_MAGICS};
use crate::occupancy::OccupancySet;
use crate::types::Slider;

/// Slots per square: 2^12, the largest relevant occupancy (a rook in a corner).
pub const TABLE_WIDTH: usize = 4096;

/// Where the magic numbers for a table build come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MagicSource {
    /// Use the shipped constants.
    #[default]
    Precomputed,
    /// Search for fresh constants at startup. Without a seed the RNG is seeded from entropy.
    Search { seed: Option<u64>, max_attempts: u64 },
}

impl MagicSource {
    pub fn search(seed: Option<u64>) -> Self {
        MagicSource::Search {
            seed,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Everything needed to look up the attacks of one slider family.
#[derive(Clone)]
struct SliderTable {
    magics: [u64; 64],
    bits: [u32; 64],
    attacks: Vec<u64>,
}

impl SliderTable {
    fn build(slider: Slider, masks: &RelevantMasks, magics: [u64; 64]) -> Result<Self, MagicError> {
        let mut bits = [0u32; 64];
        let mut attacks = vec![0u64; 64 * TABLE_WIDTH];

        for sq in 0..64u8 {
            let set = OccupancySet::new(sq, slider);
            debug_assert_eq!(set.mask, masks.get(sq, slider));
            bits[sq as usize] = set.bits();

            let row = &mut attacks[sq as usize * TABLE_WIDTH..(sq as usize + 1) * TABLE_WIDTH];
            for (occupied, attack_set) in set.iter() {
                let idx = magic_index(occupied, magics[sq as usize], set.bits());
                if row[idx] != 0 && row[idx] != attack_set {
                    return Err(MagicError::Collision {
                        square: sq,
                        slider,
                        magic: magics[sq as usize],
                    });
                }
                row[idx] = attack_set;
            }
        }

        Ok(SliderTable {
            magics,
            bits,
            attacks,
        })
    }
}

/// Attack tables for rooks and bishops. Built once, read-only afterwards.
#[derive(Clone)]
pub struct MagicTables {
    masks: RelevantMasks,
    rook: SliderTable,
    bishop: SliderTable,
}

impl MagicTables {
    /// Build the tables, searching for magic numbers first if the source asks for it.
    pub fn build(source: &MagicSource) -> Result<Self, MagicError> {
        let now = Instant::now();
        let tables = match *source {
            MagicSource::Precomputed => Self::from_magics(ROOK_MAGICS, BISHOP_MAGICS)?,
            MagicSource::Search { seed, max_attempts } => {
                let search = match seed {
                    Some(seed) => MagicSearch::seeded(seed),
                    None => MagicSearch::from_entropy(),
                };
                let mut search = search.with_max_attempts(max_attempts);
                let rook = search.find_all(Slider::Rook)?;
                let bishop = search.find_all(Slider::Bishop)?;
                Self::from_magics(rook, bishop)?
            }
        };
        info!("built magic tables from {:?} in {:?}", source, now.elapsed());
        Ok(tables)
    }

    /// Build the tables from a given set of magic numbers.
    ///
    /// Fails if a magic number sends two different attack sets to the same slot.
    pub fn from_magics(rook: [u64; 64], bishop: [u64; 64]) -> Result<Self, MagicError> {
        let masks = RelevantMasks::new();
        let rook = SliderTable::build(Slider::Rook, &masks, rook)?;
        let bishop = SliderTable::build(Slider::Bishop, &masks, bishop)?;
        Ok(MagicTables {
            masks,
            rook,
            bishop,
        })
    }

    /// Tables built from the shipped magic numbers.
    pub fn precomputed() -> Self {
        match Self::from_magics(ROOK_MAGICS, BISHOP_MAGICS) {
            Ok(tables) => tables,
            Err(e) => panic!("shipped magic numbers are broken: {e}"),
        }
    }

    #[inline(always)]
    fn table(&self, slider: Slider) -> &SliderTable {
        match slider {
            Slider::Rook => &self.rook,
            Slider::Bishop => &self.bishop,
        }
    }

    pub fn masks(&self) -> &RelevantMasks {
        &self.masks
    }

    pub fn magics(&self, slider: Slider) -> &[u64; 64] {
        &self.table(slider).magics
    }

    /// The flat `64 * TABLE_WIDTH` attack table of one family.
    pub fn raw_table(&self, slider: Slider) -> &[u64] {
        &self.table(slider).attacks
    }

    /// Table index for the given full-board occupancy.
    #[inline(always)]
    pub fn magic_index(&self, sq: u8, slider: Slider, occupied: u64) -> usize {
        let table = self.table(slider);
        let mask = self.masks.get(sq, slider);
        magic_index(occupied & mask, table.magics[sq as usize], table.bits[sq as usize])
    }

    /// Attacks of a slider on `sq`, given every occupied square on the board.
    #[inline(always)]
    pub fn attacks(&self, sq: u8, slider: Slider, occupied: u64) -> u64 {
        let idx = self.magic_index(sq, slider, occupied);
        self.table(slider).attacks[sq as usize * TABLE_WIDTH + idx]
    }

    #[inline(always)]
    pub fn rook_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.attacks(sq, Slider::Rook, occupied)
    }

    #[inline(always)]
    pub fn bishop_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.attacks(sq, Slider::Bishop, occupied)
    }

    /// Get queen attacks (combines bishop and rook)
    #[inline(always)]
    pub fn queen_attacks(&self, sq: u8, occupied: u64) -> u64 {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }
}

/// Shared tables built from the shipped magic numbers on first use.
pub static PRECOMPUTED_TABLES: Lazy<MagicTables> = Lazy::new(MagicTables::precomputed);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::{pos_to_sq, sq_to_bb};
    use crate::occupancy::true_attacks;

    #[test]
    fn test_magic_rook_attacks_empty_board() {
        let sq = pos_to_sq(4, 5); // e4
        assert_eq!(PRECOMPUTED_TABLES.rook_attacks(sq, 0).count_ones(), 14);
    }

    #[test]
    fn test_magic_bishop_attacks_with_blockers() {
        // Bishop on e4, with pieces on c2 and g6
        let sq = pos_to_sq(4, 5);
        let occupied = sq_to_bb(pos_to_sq(2, 3)) | sq_to_bb(pos_to_sq(6, 7));
        let attacks = PRECOMPUTED_TABLES.bishop_attacks(sq, occupied);

        assert!(attacks & sq_to_bb(pos_to_sq(2, 3)) != 0); // c2 (blocker)
        assert!(attacks & sq_to_bb(pos_to_sq(6, 7)) != 0); // g6 (blocker)
        assert!(attacks & sq_to_bb(pos_to_sq(1, 2)) == 0); // b1 (blocked)
        assert!(attacks & sq_to_bb(pos_to_sq(7, 8)) == 0); // h7 (blocked)
    }

    #[test]
    fn test_magic_queen_attacks() {
        let sq = pos_to_sq(4, 5); // e4
        assert_eq!(PRECOMPUTED_TABLES.queen_attacks(sq, 0).count_ones(), 27);
    }

    #[test]
    fn test_magic_matches_ray_cast() {
        // Occupancy outside the relevant mask must not change the lookup
        let test_positions = [
            (pos_to_sq(1, 1), 0u64),
            (pos_to_sq(4, 5), 0u64),
            (pos_to_sq(8, 8), u64::MAX),
            (pos_to_sq(4, 5), sq_to_bb(pos_to_sq(2, 5)) | sq_to_bb(pos_to_sq(6, 5))),
            (pos_to_sq(4, 5), sq_to_bb(pos_to_sq(2, 3)) | sq_to_bb(pos_to_sq(6, 7))),
            (pos_to_sq(2, 2), 0xFFFF_0000_0000_FFFF),
        ];

        for (sq, occupied) in test_positions {
            for slider in Slider::ALL {
                assert_eq!(
                    PRECOMPUTED_TABLES.attacks(sq, slider, occupied),
                    true_attacks(occupied, sq, slider),
                    "{slider} mismatch at sq={sq}, occ={occupied:#x}"
                );
            }
        }
    }

    #[test]
    fn test_bad_magics_fail_to_build() {
        let mut rook = ROOK_MAGICS;
        rook[5] = 0;
        assert!(matches!(
            MagicTables::from_magics(rook, BISHOP_MAGICS),
            Err(MagicError::Collision { square: 5, slider: Slider::Rook, .. })
        ));
    }

    #[test]
    fn test_build_default_source() {
        let tables = MagicTables::build(&MagicSource::default()).unwrap();
        assert_eq!(tables.magics(Slider::Rook), &ROOK_MAGICS);
        assert_eq!(tables.magics(Slider::Bishop), &BISHOP_MAGICS);
        assert_eq!(tables.raw_table(Slider::Bishop).len(), 64 * TABLE_WIDTH);
    }
}
