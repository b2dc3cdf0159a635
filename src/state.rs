//! Irreversible position state that has to be saved before a move and
//! restored after it is taken back.

use itertools::Itertools;
use log::trace;

use crate::bitboard::sq_to_algebraic;
use crate::error::StateError;

/// Check and castling-related flags for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFlags {
    pub white_in_check: bool,
    pub white_king_moved: bool,
    pub white_queenside_rook_moved: bool,
    pub white_kingside_rook_moved: bool,
    pub black_in_check: bool,
    pub black_king_moved: bool,
    pub black_queenside_rook_moved: bool,
    pub black_kingside_rook_moved: bool,
}

impl StateFlags {
    /// Pack into one byte, white in-check at bit 0 through black kingside rook at bit 7.
    pub fn pack(&self) -> u8 {
        self.in_order()
            .iter()
            .enumerate()
            .fold(0u8, |acc, (bit, &flag)| acc | (flag as u8) << bit)
    }

    pub fn unpack(bits: u8) -> Self {
        let flag = |bit: u8| bits >> bit & 1 == 1;
        StateFlags {
            white_in_check: flag(0),
            white_king_moved: flag(1),
            white_queenside_rook_moved: flag(2),
            white_kingside_rook_moved: flag(3),
            black_in_check: flag(4),
            black_king_moved: flag(5),
            black_queenside_rook_moved: flag(6),
            black_kingside_rook_moved: flag(7),
        }
    }

    fn in_order(&self) -> [bool; 8] {
        [
            self.white_in_check,
            self.white_king_moved,
            self.white_queenside_rook_moved,
            self.white_kingside_rook_moved,
            self.black_in_check,
            self.black_king_moved,
            self.black_queenside_rook_moved,
            self.black_kingside_rook_moved,
        ]
    }

    fn named(&self) -> [(&'static str, bool); 8] {
        [
            ("black_in_check", self.black_in_check),
            ("black_king_moved", self.black_king_moved),
            ("black_kingside_rook_moved", self.black_kingside_rook_moved),
            ("black_queenside_rook_moved", self.black_queenside_rook_moved),
            ("white_in_check", self.white_in_check),
            ("white_king_moved", self.white_king_moved),
            ("white_kingside_rook_moved", self.white_kingside_rook_moved),
            ("white_queenside_rook_moved", self.white_queenside_rook_moved),
        ]
    }
}

/// Current flags and en passant target, plus the saved copies of earlier plies.
///
/// The flag stack and the en passant stack always have the same depth.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    pub flags: StateFlags,
    pub en_passant: Option<u8>,
    flag_stack: Vec<u8>,
    en_passant_stack: Vec<Option<u8>>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the current flags and en passant target.
    pub fn save_state(&mut self) {
        self.flag_stack.push(self.flags.pack());
        self.en_passant_stack.push(self.en_passant);
        trace!("saved state {:#010b}, depth {}", self.flags.pack(), self.depth());
    }

    /// Pop the most recently saved flags and en passant target back into place.
    pub fn restore_state(&mut self) -> Result<(), StateError> {
        debug_assert_eq!(self.flag_stack.len(), self.en_passant_stack.len());
        let (Some(bits), Some(en_passant)) = (self.flag_stack.pop(), self.en_passant_stack.pop())
        else {
            return Err(StateError::Underflow);
        };
        self.flags = StateFlags::unpack(bits);
        self.en_passant = en_passant;
        trace!("restored state {:#010b}, depth {}", bits, self.depth());
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.flag_stack.len()
    }

    /// Every flag and the en passant target as `name\tvalue` lines, sorted by name.
    pub fn describe(&self) -> String {
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), sq_to_algebraic);
        let mut lines = vec![format!("en_passant\t{en_passant}")];
        lines.extend(
            self.flags
                .named()
                .iter()
                .map(|(name, value)| format!("{name}\t{}", *value as u8)),
        );
        lines.iter().sorted().join("\n")
    }
}
