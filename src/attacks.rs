//! Move bitboards for every piece type.
//!
//! Leapers and pawns work on whole populations at once through shifts. Sliders
//! go through the magic tables one piece at a time.

use crate::bitboard::{
    bit_scan_forward, east_one, north_east_one, north_one, north_west_one, south_east_one,
    south_one, south_west_one, sq_to_bb, west_one, BitboardIter, CLEAR_FILE, FILE_A, FILE_B,
    FILE_G, FILE_H, RANK_MASKS,
};
use crate::board::Board;
use crate::tables::MagicTables;
use crate::types::{Color, PieceType, Slider};

/// Squares an en passant target can be on for the side capturing onto it.
const WHITE_EP_BAND: u64 = RANK_MASKS[4] | RANK_MASKS[5];
const BLACK_EP_BAND: u64 = RANK_MASKS[2] | RANK_MASKS[3];

pub fn king_moves(kings: u64, friendly: u64) -> u64 {
    let moves = north_one(kings)
        | north_east_one(kings)
        | east_one(kings)
        | south_east_one(kings)
        | south_one(kings)
        | south_west_one(kings)
        | west_one(kings)
        | north_west_one(kings);
    moves & !friendly
}

pub fn knight_moves(knights: u64, friendly: u64) -> u64 {
    let not_h = CLEAR_FILE[FILE_H];
    let not_a = CLEAR_FILE[FILE_A];
    let not_gh = CLEAR_FILE[FILE_G] & CLEAR_FILE[FILE_H];
    let not_ab = CLEAR_FILE[FILE_A] & CLEAR_FILE[FILE_B];

    // Clip the origin before shifting so nothing lands on the far side of the board
    let moves = (knights & not_h) << 17
        | (knights & not_a) << 15
        | (knights & not_gh) << 10
        | (knights & not_ab) << 6
        | (knights & not_gh) >> 6
        | (knights & not_ab) >> 10
        | (knights & not_h) >> 15
        | (knights & not_a) >> 17;
    moves & !friendly
}

#[inline(always)]
fn push(bb: u64, color: Color) -> u64 {
    match color {
        Color::White => north_one(bb),
        Color::Black => south_one(bb),
    }
}

pub fn pawn_single_pushes(pawns: u64, empty: u64, color: Color) -> u64 {
    push(pawns, color) & empty
}

/// Target squares of double pushes: rank 4 for white, rank 5 for black.
pub fn pawn_double_pushes(pawns: u64, empty: u64, color: Color) -> u64 {
    let target_rank = match color {
        Color::White => RANK_MASKS[3],
        Color::Black => RANK_MASKS[4],
    };
    push(pawn_single_pushes(pawns, empty, color), color) & target_rank & empty
}

/// Diagonal squares attacked by the pawns, regardless of what stands there.
pub fn pawn_attacks(pawns: u64, color: Color) -> u64 {
    match color {
        Color::White => north_east_one(pawns) | north_west_one(pawns),
        Color::Black => south_east_one(pawns) | south_west_one(pawns),
    }
}

pub fn pawn_captures(pawns: u64, enemy: u64, color: Color) -> u64 {
    pawn_attacks(pawns, color) & enemy
}

/// The en passant capture square, if any pawn can take onto it.
///
/// The target only counts on the ranks it can legally appear on for the capturing
/// side: ranks 5-6 for white, ranks 3-4 for black.
pub fn pawn_en_passant(pawns: u64, empty: u64, en_passant: Option<u8>, color: Color) -> u64 {
    let Some(ep_sq) = en_passant else {
        return 0;
    };
    let band = match color {
        Color::White => WHITE_EP_BAND,
        Color::Black => BLACK_EP_BAND,
    };
    let target = sq_to_bb(ep_sq) & band;
    pawn_attacks(pawns, color) & empty & target
}

/// Pawns that have an empty square in front of them.
pub fn pawns_able_to_push(pawns: u64, empty: u64, color: Color) -> u64 {
    push(empty, color.other_color()) & pawns
}

/// Pawns that can make a double push.
pub fn pawns_able_to_double_push(pawns: u64, empty: u64, color: Color) -> u64 {
    let target_rank = match color {
        Color::White => RANK_MASKS[3],
        Color::Black => RANK_MASKS[4],
    };
    let behind = color.other_color();
    let empty_middle = push(empty & target_rank, behind) & empty;
    pawns_able_to_push(pawns, empty_middle, color)
}

/// Moves of a single sliding piece.
///
/// `piece` must have exactly one bit set. Anything else looks up the attacks of
/// its lowest set bit only.
pub fn slider_moves(
    tables: &MagicTables,
    piece: u64,
    occupied: u64,
    friendly: u64,
    slider: Slider,
) -> u64 {
    debug_assert!(piece.count_ones() == 1, "slider lookup needs a single piece, got {piece:#x}");
    let sq = bit_scan_forward(piece);
    tables.attacks(sq, slider, occupied) & !friendly
}

pub fn queen_moves(tables: &MagicTables, piece: u64, occupied: u64, friendly: u64) -> u64 {
    slider_moves(tables, piece, occupied, friendly, Slider::Rook)
        | slider_moves(tables, piece, occupied, friendly, Slider::Bishop)
}

/// Move bitboards for one side of a board.
pub struct AttackGenerator<'a> {
    tables: &'a MagicTables,
    board: &'a Board,
}

impl<'a> AttackGenerator<'a> {
    pub fn new(tables: &'a MagicTables, board: &'a Board) -> Self {
        Self { tables, board }
    }

    pub fn king(&self, color: Color) -> u64 {
        king_moves(
            self.board.piece_bb(color, PieceType::King),
            self.board.pieces_bb(color),
        )
    }

    pub fn knights(&self, color: Color) -> u64 {
        knight_moves(
            self.board.piece_bb(color, PieceType::Knight),
            self.board.pieces_bb(color),
        )
    }

    pub fn pawn_pushes(&self, color: Color) -> u64 {
        pawn_single_pushes(
            self.board.piece_bb(color, PieceType::Pawn),
            self.board.empty_squares(),
            color,
        )
    }

    pub fn pawn_double_pushes(&self, color: Color) -> u64 {
        pawn_double_pushes(
            self.board.piece_bb(color, PieceType::Pawn),
            self.board.empty_squares(),
            color,
        )
    }

    pub fn pawn_captures(&self, color: Color) -> u64 {
        pawn_captures(
            self.board.piece_bb(color, PieceType::Pawn),
            self.board.pieces_bb(color.other_color()),
            color,
        )
    }

    pub fn en_passant(&self, color: Color, en_passant: Option<u8>) -> u64 {
        pawn_en_passant(
            self.board.piece_bb(color, PieceType::Pawn),
            self.board.empty_squares(),
            en_passant,
            color,
        )
    }

    /// Moves of the piece on `sq`, which must hold a slider of `color`.
    pub fn slider_at(&self, sq: u8, color: Color, slider: Slider) -> u64 {
        slider_moves(
            self.tables,
            sq_to_bb(sq),
            self.board.occupied(),
            self.board.pieces_bb(color),
            slider,
        )
    }

    /// Union of the moves of every piece of the given type, one piece at a time.
    fn sliders(&self, color: Color, piece_type: PieceType, slider: Slider) -> u64 {
        BitboardIter(self.board.piece_bb(color, piece_type))
            .map(|sq| self.slider_at(sq, color, slider))
            .fold(0, |acc, moves| acc | moves)
    }

    pub fn rook(&self, color: Color) -> u64 {
        self.sliders(color, PieceType::Rook, Slider::Rook)
    }

    pub fn bishop(&self, color: Color) -> u64 {
        self.sliders(color, PieceType::Bishop, Slider::Bishop)
    }

    pub fn queen(&self, color: Color) -> u64 {
        self.sliders(color, PieceType::Queen, Slider::Rook)
            | self.sliders(color, PieceType::Queen, Slider::Bishop)
    }
}
