//! Relevant occupancy masks: the squares whose occupancy can change a sliding
//! piece's attacks from a given square.
//!
//! The last square of every ray is left out. A blocker on the board edge has
//! nothing behind it to hide, so it never changes the attack set.

use crate::types::Slider;

/// Relevant occupancy mask for a slider standing on `sq`.
pub fn relevant_occupancy(sq: u8, slider: Slider) -> u64 {
    let rank = (sq >> 3) as i8;
    let file = (sq & 7) as i8;
    let mut mask = 0u64;

    for &(dr, df) in slider.directions() {
        let mut r = rank + dr;
        let mut f = file + df;
        // Stop one square before the edge in the direction of travel
        while (0..8).contains(&(r + dr)) && (0..8).contains(&(f + df)) {
            mask |= 1u64 << (r * 8 + f);
            r += dr;
            f += df;
        }
    }
    mask
}

/// Number of relevant squares, which is also the magic index width for the square.
#[inline]
pub fn relevant_bits(sq: u8, slider: Slider) -> u32 {
    relevant_occupancy(sq, slider).count_ones()
}

/// Relevant occupancy masks for every square, for both slider families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevantMasks {
    pub rook: [u64; 64],
    pub bishop: [u64; 64],
}

impl RelevantMasks {
    pub fn new() -> Self {
        let mut rook = [0u64; 64];
        let mut bishop = [0u64; 64];
        for sq in 0..64u8 {
            rook[sq as usize] = relevant_occupancy(sq, Slider::Rook);
            bishop[sq as usize] = relevant_occupancy(sq, Slider::Bishop);
        }
        RelevantMasks { rook, bishop }
    }

    #[inline(always)]
    pub fn get(&self, sq: u8, slider: Slider) -> u64 {
        match slider {
            Slider::Rook => self.rook[sq as usize],
            Slider::Bishop => self.bishop[sq as usize],
        }
    }
}

impl Default for RelevantMasks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::{pos_to_sq, sq_to_bb};
    use crate::occupancy::true_attacks;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_rook_mask_corner() {
        // a1: a2..a7 and b1..g1
        let expected = 0x0001_0101_0101_017E;
        assert_eq!(relevant_occupancy(0, Slider::Rook), expected);
    }

    #[test]
    fn test_rook_mask_b2() {
        // b3..b7 on the file, c2..g2 on the rank
        let expected = 0x0002_0202_0202_7C00;
        assert_eq!(relevant_occupancy(pos_to_sq(2, 2), Slider::Rook), expected);
    }

    #[test]
    fn test_bishop_mask_e4() {
        let sq = pos_to_sq(4, 5);
        let mask = relevant_occupancy(sq, Slider::Bishop);
        // d3 c2 / f5 g6 / f3 g2 / d5 c6 b7
        let expected = [(3, 4), (2, 3), (5, 6), (6, 7), (3, 6), (2, 7), (5, 4), (6, 3), (7, 2)]
            .iter()
            .fold(0u64, |acc, &(r, f)| acc | sq_to_bb(pos_to_sq(r, f)));
        assert_eq!(mask, expected);
    }

    #[test_case(0, Slider::Rook, 12; "rook corner")]
    #[test_case(1, Slider::Rook, 11; "rook edge")]
    #[test_case(27, Slider::Rook, 10; "rook center")]
    #[test_case(0, Slider::Bishop, 6; "bishop corner")]
    #[test_case(1, Slider::Bishop, 5; "bishop edge")]
    #[test_case(27, Slider::Bishop, 9; "bishop center")]
    #[test_case(18, Slider::Bishop, 7; "bishop inner ring")]
    fn test_relevant_bits(sq: u8, slider: Slider, bits: u32) {
        assert_eq!(relevant_bits(sq, slider), bits);
    }

    #[test]
    fn test_mask_is_strict_subset_of_empty_board_attacks() {
        for slider in Slider::ALL {
            for sq in 0..64u8 {
                let mask = relevant_occupancy(sq, slider);
                let ray = true_attacks(0, sq, slider);
                assert_eq!(mask & !ray, 0, "{slider} mask leaves the ray on {sq}");
                assert_ne!(mask, ray);
                assert_eq!(mask & sq_to_bb(sq), 0);
            }
        }
    }

    #[test]
    fn test_max_population() {
        let masks = RelevantMasks::new();
        assert_eq!(masks.rook.iter().map(|m| m.count_ones()).max(), Some(12));
        assert_eq!(masks.bishop.iter().map(|m| m.count_ones()).max(), Some(9));
        assert_eq!(masks.get(9, Slider::Rook), relevant_occupancy(9, Slider::Rook));
    }
}
