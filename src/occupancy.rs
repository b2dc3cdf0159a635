//! Occupancy variations of a relevant mask, and the reference ray-cast that the
//! magic tables have to reproduce.

use crate::bitboard::BitboardIter;
use crate::types::Slider;

/// Spread the bits of `index` over the set bits of `mask`.
///
/// Bit j of `index` decides whether the j-th lowest set bit of `mask` is occupied.
pub fn variation_from_index(index: usize, mask: u64) -> u64 {
    BitboardIter(mask)
        .enumerate()
        .filter(|&(j, _)| (index >> j) & 1 == 1)
        .fold(0u64, |acc, (_, sq)| acc | 1u64 << sq)
}

/// Every subset of `mask`, ordered by variation index (2^popcount entries).
pub fn enumerate_variations(mask: u64) -> Vec<u64> {
    let count = 1usize << mask.count_ones();
    (0..count).map(|i| variation_from_index(i, mask)).collect()
}

/// Attacks of a slider on `sq` when exactly the squares in `occupied` hold pieces.
///
/// Each ray runs to the board edge or up to and including the first occupied square.
pub fn true_attacks(occupied: u64, sq: u8, slider: Slider) -> u64 {
    let rank = (sq >> 3) as i8;
    let file = (sq & 7) as i8;
    let mut attacks = 0u64;

    for &(dr, df) in slider.directions() {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let target = 1u64 << (r * 8 + f);
            attacks |= target;
            if occupied & target != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

/// A relevant mask together with all its variations and their true attacks.
pub struct OccupancySet {
    pub mask: u64,
    pub variations: Vec<u64>,
    pub attacks: Vec<u64>,
}

impl OccupancySet {
    pub fn new(sq: u8, slider: Slider) -> Self {
        let mask = crate::attack_set::relevant_occupancy(sq, slider);
        let variations = enumerate_variations(mask);
        let attacks = variations
            .iter()
            .map(|&occupied| true_attacks(occupied, sq, slider))
            .collect();
        OccupancySet {
            mask,
            variations,
            attacks,
        }
    }

    pub fn bits(&self) -> u32 {
        self.mask.count_ones()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.variations.iter().copied().zip(self.attacks.iter().copied())
    }
}
