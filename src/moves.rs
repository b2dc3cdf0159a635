//! Packed 32-bit move encoding and pawn move classification.
//!
//! Layout, least significant bit first:
//!
//! | bits    | field                     |
//! |---------|---------------------------|
//! | 0..5    | kind of move              |
//! | 5..10   | from square               |
//! | 10..16  | to square                 |
//! | 16..21  | captured piece code       |
//! | 21..26  | promotion piece code      |
//!
//! The from field is only five bits wide, so origin squares 32..63 do not fit: the
//! high bit is lost from `from()` and shows up as bit 0 of `to()`. Encoding keeps
//! the raw shifts so that packed values stay compatible with existing data.

use std::fmt;

use crate::bitboard::{sq_file, sq_rank, sq_to_algebraic, sq_to_bb};
use crate::board::Board;
use crate::error::MoveError;
use crate::types::{Color, PieceType, PROMOTION_PIECES};

pub const KIND_SHIFT: u32 = 0;
pub const FROM_SHIFT: u32 = 5;
pub const TO_SHIFT: u32 = 10;
pub const CAPTURED_SHIFT: u32 = 16;
pub const PROMOTION_SHIFT: u32 = 21;

const KIND_MASK: u32 = 0x1F;
const FROM_MASK: u32 = 0x1F;
const TO_MASK: u32 = 0x3F;
const PIECE_MASK: u32 = 0x1F;

/// Squares on either back rank.
const BACK_RANKS: u64 = 0xFF00_0000_0000_00FF;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MoveKind {
    Quiet = 0,
    DoublePawnPush = 1,
    Capture = 4,
    EnPassantCapture = 5,
    PromotionCapture = 15,
}

impl MoveKind {
    pub fn from_tag(tag: u32) -> Option<MoveKind> {
        match tag {
            0 => Some(MoveKind::Quiet),
            1 => Some(MoveKind::DoublePawnPush),
            4 => Some(MoveKind::Capture),
            5 => Some(MoveKind::EnPassantCapture),
            15 => Some(MoveKind::PromotionCapture),
            _ => None,
        }
    }

    /// Every tag from 8 up is a promotion.
    pub fn is_promotion(&self) -> bool {
        *self as u32 >= 8
    }
}

/// Field value for an optional piece: 0 for none, otherwise the piece type plus one.
#[inline(always)]
fn piece_code(piece: Option<PieceType>) -> u32 {
    piece.map_or(0, |p| p as u32 + 1)
}

#[inline(always)]
fn piece_from_code(code: u32) -> Option<PieceType> {
    code.checked_sub(1)
        .and_then(|idx| PieceType::from_index(idx as usize))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EncodedMove(pub u32);

impl EncodedMove {
    pub fn encode(
        kind: MoveKind,
        from: u8,
        to: u8,
        captured: Option<PieceType>,
        promotion: Option<PieceType>,
    ) -> Self {
        let mut packed = (kind as u32) << KIND_SHIFT;
        packed |= (from as u32) << FROM_SHIFT;
        packed |= (to as u32) << TO_SHIFT;
        packed |= piece_code(captured) << CAPTURED_SHIFT;
        packed |= piece_code(promotion) << PROMOTION_SHIFT;
        EncodedMove(packed)
    }

    /// Raw kind tag.
    #[inline(always)]
    pub fn kind_tag(&self) -> u32 {
        (self.0 >> KIND_SHIFT) & KIND_MASK
    }

    pub fn kind(&self) -> Option<MoveKind> {
        MoveKind::from_tag(self.kind_tag())
    }

    #[inline(always)]
    pub fn from(&self) -> u8 {
        ((self.0 >> FROM_SHIFT) & FROM_MASK) as u8
    }

    #[inline(always)]
    pub fn to(&self) -> u8 {
        ((self.0 >> TO_SHIFT) & TO_MASK) as u8
    }

    pub fn captured(&self) -> Option<PieceType> {
        piece_from_code((self.0 >> CAPTURED_SHIFT) & PIECE_MASK)
    }

    pub fn promotion(&self) -> Option<PieceType> {
        piece_from_code((self.0 >> PROMOTION_SHIFT) & PIECE_MASK)
    }

    pub fn is_promotion(&self) -> bool {
        self.kind_tag() >= 8
    }
}

impl fmt::Display for EncodedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", sq_to_algebraic(self.from()), sq_to_algebraic(self.to()))?;
        if let Some(piece) = self.promotion() {
            write!(f, "{}", piece.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// Every encoding of one pawn move, and the en passant target it leaves behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PawnMoves {
    pub moves: Vec<EncodedMove>,
    pub en_passant: Option<u8>,
}

/// Classify and encode a pawn move from `from` to `to` on `board`.
///
/// The destination is assumed to be one the pawn can actually reach. A capture onto
/// the back rank yields four moves, one per promotion piece. A double push records
/// the square the pawn skipped as the new en passant target.
pub fn encode_pawn_move(board: &Board, from: u8, to: u8) -> Result<PawnMoves, MoveError> {
    for sq in [from, to] {
        if sq >= 64 {
            return Err(MoveError::SquareOutOfRange(sq));
        }
    }
    let color = match board.piece_at(from) {
        Some((color, PieceType::Pawn)) => color,
        _ => return Err(MoveError::NoPawnOnSquare(from)),
    };

    let captured = board.piece_at(to).map(|(_, piece_type)| piece_type);
    let diagonal = sq_file(from) != sq_file(to);
    let onto_back_rank = sq_to_bb(to) & BACK_RANKS != 0;
    let distance = sq_rank(from).abs_diff(sq_rank(to));

    let mut en_passant = None;
    let kind = if captured.is_some() {
        if onto_back_rank {
            MoveKind::PromotionCapture
        } else {
            MoveKind::Capture
        }
    } else if diagonal {
        MoveKind::EnPassantCapture
    } else if onto_back_rank {
        return Err(MoveError::QuietPromotion { from, to });
    } else if distance == 2 {
        en_passant = Some(match color {
            Color::White => from + 8,
            Color::Black => to + 8,
        });
        MoveKind::DoublePawnPush
    } else {
        MoveKind::Quiet
    };

    let moves = if kind.is_promotion() {
        PROMOTION_PIECES
            .iter()
            .map(|&piece| EncodedMove::encode(kind, from, to, captured, Some(piece)))
            .collect()
    } else {
        let captured = match kind {
            MoveKind::EnPassantCapture => Some(PieceType::Pawn),
            _ => captured,
        };
        vec![EncodedMove::encode(kind, from, to, captured, None)]
    };

    Ok(PawnMoves { moves, en_passant })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitboard::pos_to_sq;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_layout_offsets() {
        let mv = EncodedMove::encode(
            MoveKind::Capture,
            1,
            2,
            Some(PieceType::Pawn),
            Some(PieceType::Queen),
        );
        assert_eq!(mv.0, 4 | 1 << 5 | 2 << 10 | 1 << 16 | 5 << 21);
    }

    #[test_case(0, 63; "lowest origin")]
    #[test_case(31, 0; "highest origin that fits")]
    #[test_case(12, 28; "pawn double push")]
    fn test_fields_survive_encoding(from: u8, to: u8) {
        let mv = EncodedMove::encode(
            MoveKind::EnPassantCapture,
            from,
            to,
            Some(PieceType::Pawn),
            None,
        );
        assert_eq!(mv.kind(), Some(MoveKind::EnPassantCapture));
        assert_eq!(mv.from(), from);
        assert_eq!(mv.to(), to);
        assert_eq!(mv.captured(), Some(PieceType::Pawn));
        assert_eq!(mv.promotion(), None);
    }

    #[test]
    fn test_from_field_truncates_high_squares() {
        // 40 needs six bits: the top bit lands in the to field
        let mv = EncodedMove::encode(MoveKind::Quiet, 40, 48, None, None);
        assert_eq!(mv.from(), 8);
        assert_eq!(mv.to(), 49);
        assert_ne!(mv.from(), 40);
    }

    #[test]
    fn test_every_piece_code() {
        for piece in PieceType::ALL {
            let mv = EncodedMove::encode(MoveKind::PromotionCapture, 0, 0, Some(piece), Some(piece));
            assert_eq!(mv.captured(), Some(piece));
            assert_eq!(mv.promotion(), Some(piece));
            assert!(mv.is_promotion());
        }
    }

    #[test]
    fn test_unknown_kind_tag() {
        assert_eq!(EncodedMove(3).kind(), None);
        assert_eq!(EncodedMove(3).kind_tag(), 3);
        assert!(MoveKind::PromotionCapture.is_promotion());
        assert!(!MoveKind::EnPassantCapture.is_promotion());
    }

    #[test]
    fn test_single_push() {
        let board = Board::new();
        let moves = encode_pawn_move(&board, pos_to_sq(2, 5), pos_to_sq(3, 5)).unwrap();
        assert_eq!(moves.en_passant, None);
        assert_eq!(moves.moves.len(), 1);
        assert_eq!(moves.moves[0].kind(), Some(MoveKind::Quiet));
        assert_eq!(moves.moves[0].to_string(), "e2e3");
    }

    #[test]
    fn test_double_push_sets_en_passant() {
        let board = Board::new();
        let white = encode_pawn_move(&board, pos_to_sq(2, 5), pos_to_sq(4, 5)).unwrap();
        assert_eq!(white.moves[0].kind(), Some(MoveKind::DoublePawnPush));
        assert_eq!(white.en_passant, Some(pos_to_sq(3, 5)));

        let black = encode_pawn_move(&board, pos_to_sq(7, 4), pos_to_sq(5, 4)).unwrap();
        assert_eq!(black.moves[0].kind(), Some(MoveKind::DoublePawnPush));
        assert_eq!(black.en_passant, Some(pos_to_sq(6, 4)));
    }

    #[test]
    fn test_capture_and_en_passant() {
        let mut board = Board::empty();
        board.set_piece(Color::White, PieceType::Pawn, pos_to_sq(2, 2)).unwrap();
        board.set_piece(Color::Black, PieceType::Knight, pos_to_sq(3, 3)).unwrap();

        let capture = encode_pawn_move(&board, pos_to_sq(2, 2), pos_to_sq(3, 3)).unwrap();
        assert_eq!(capture.moves[0].kind(), Some(MoveKind::Capture));
        assert_eq!(capture.moves[0].captured(), Some(PieceType::Knight));

        let en_passant = encode_pawn_move(&board, pos_to_sq(2, 2), pos_to_sq(3, 1)).unwrap();
        assert_eq!(en_passant.moves[0].kind(), Some(MoveKind::EnPassantCapture));
        assert_eq!(en_passant.moves[0].captured(), Some(PieceType::Pawn));
        assert_eq!(en_passant.en_passant, None);
    }

    #[test]
    fn test_promotion_capture_yields_four_moves() {
        let mut board = Board::empty();
        board.set_piece(Color::Black, PieceType::Pawn, pos_to_sq(2, 7)).unwrap();
        board.set_piece(Color::White, PieceType::Rook, pos_to_sq(1, 8)).unwrap();

        let promo = encode_pawn_move(&board, pos_to_sq(2, 7), pos_to_sq(1, 8)).unwrap();
        let pieces: Vec<_> = promo.moves.iter().map(|m| m.promotion()).collect();
        assert_eq!(
            pieces,
            vec![
                Some(PieceType::Knight),
                Some(PieceType::Bishop),
                Some(PieceType::Rook),
                Some(PieceType::Queen)
            ]
        );
        assert!(promo.moves.iter().all(|m| m.kind() == Some(MoveKind::PromotionCapture)));
        assert!(promo.moves.iter().all(|m| m.captured() == Some(PieceType::Rook)));
        assert_eq!(promo.moves[3].to_string(), "g2h1q");
    }

    #[test]
    fn test_quiet_promotion_is_rejected() {
        let mut board = Board::empty();
        let from = pos_to_sq(7, 1);
        let to = pos_to_sq(8, 1);
        board.set_piece(Color::White, PieceType::Pawn, from).unwrap();
        assert_eq!(
            encode_pawn_move(&board, from, to),
            Err(MoveError::QuietPromotion { from, to })
        );
    }

    #[test]
    fn test_not_a_pawn() {
        let board = Board::new();
        assert_eq!(
            encode_pawn_move(&board, pos_to_sq(1, 2), pos_to_sq(3, 3)),
            Err(MoveError::NoPawnOnSquare(pos_to_sq(1, 2)))
        );
        assert_eq!(
            encode_pawn_move(&board, 8, 64),
            Err(MoveError::SquareOutOfRange(64))
        );
    }
}
