//! Bitboard position: one bitboard per color and piece type, plus the
//! per-color and whole-board aggregates.

use std::fmt;

use itertools::Itertools;

use crate::bitboard::{sq_to_algebraic, sq_to_bb};
use crate::error::BoardError;
use crate::types::{Color, PieceType};

/// Standard starting position, white pieces in `PieceType` order.
const WHITE_START: [u64; 6] = [
    0x0000_0000_0000_FF00, // pawns
    0x0000_0000_0000_0081, // rooks
    0x0000_0000_0000_0042, // knights
    0x0000_0000_0000_0024, // bishops
    0x0000_0000_0000_0008, // queen
    0x0000_0000_0000_0010, // king
];

const BLACK_START: [u64; 6] = [
    0x00FF_0000_0000_0000,
    0x8100_0000_0000_0000,
    0x4200_0000_0000_0000,
    0x2400_0000_0000_0000,
    0x0800_0000_0000_0000,
    0x1000_0000_0000_0000,
];

#[inline(always)]
fn piece_index(color: Color, piece_type: PieceType) -> usize {
    color as usize * 6 + piece_type as usize
}

/// Turns a textual position description into piece bitboards.
///
/// The layout of the result is the one `Board::from_piece_bitboards` takes:
/// white pawn, rook, knight, bishop, queen, king, then the same for black.
pub trait PositionParser {
    fn parse(&self, text: &str) -> Result<[u64; 12], BoardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pieces: [u64; 12],
    white: u64,
    black: u64,
    occupied: u64,
}

impl Board {
    /// The standard starting position.
    pub fn new() -> Self {
        let mut pieces = [0u64; 12];
        pieces[..6].copy_from_slice(&WHITE_START);
        pieces[6..].copy_from_slice(&BLACK_START);
        Self::with_aggregates(pieces)
    }

    pub fn empty() -> Self {
        Self::with_aggregates([0; 12])
    }

    /// Build a board from the 12 piece bitboards. No square may hold two pieces.
    pub fn from_piece_bitboards(pieces: [u64; 12]) -> Result<Self, BoardError> {
        let mut seen = 0u64;
        for bb in pieces {
            if seen & bb != 0 {
                return Err(BoardError::OverlappingPieces(seen & bb));
            }
            seen |= bb;
        }
        Ok(Self::with_aggregates(pieces))
    }

    pub fn from_notation<P: PositionParser + ?Sized>(
        parser: &P,
        text: &str,
    ) -> Result<Self, BoardError> {
        Self::from_piece_bitboards(parser.parse(text)?)
    }

    fn with_aggregates(pieces: [u64; 12]) -> Self {
        let mut board = Board {
            pieces,
            white: 0,
            black: 0,
            occupied: 0,
        };
        board.update_aggregates();
        board
    }

    fn update_aggregates(&mut self) {
        self.white = self.pieces[..6].iter().fold(0, |acc, bb| acc | bb);
        self.black = self.pieces[6..].iter().fold(0, |acc, bb| acc | bb);
        self.occupied = self.white | self.black;
    }

    pub fn set_piece(
        &mut self,
        color: Color,
        piece_type: PieceType,
        sq: u8,
    ) -> Result<(), BoardError> {
        if sq >= 64 {
            return Err(BoardError::SquareOutOfRange(sq));
        }
        if self.occupied & sq_to_bb(sq) != 0 {
            return Err(BoardError::SquareOccupied(sq));
        }
        self.pieces[piece_index(color, piece_type)] |= sq_to_bb(sq);
        self.update_aggregates();
        Ok(())
    }

    /// Remove whatever stands on `sq` and return it.
    pub fn clear_piece(&mut self, sq: u8) -> Result<(Color, PieceType), BoardError> {
        let (color, piece_type) = self.piece_at(sq).ok_or(BoardError::EmptySquare(sq))?;
        self.pieces[piece_index(color, piece_type)] &= !sq_to_bb(sq);
        self.update_aggregates();
        Ok((color, piece_type))
    }

    /// Move the piece on `from` to `to`, removing anything standing on `to`.
    ///
    /// Returns the captured piece, if any.
    pub fn move_piece(
        &mut self,
        from: u8,
        to: u8,
    ) -> Result<Option<(Color, PieceType)>, BoardError> {
        let (color, piece_type) = self.piece_at(from).ok_or(BoardError::EmptySquare(from))?;
        if to >= 64 {
            return Err(BoardError::SquareOutOfRange(to));
        }
        if from == to {
            return Ok(None);
        }
        let captured = self.piece_at(to);
        if let Some((captured_color, captured_type)) = captured {
            self.pieces[piece_index(captured_color, captured_type)] &= !sq_to_bb(to);
        }
        let idx = piece_index(color, piece_type);
        self.pieces[idx] = (self.pieces[idx] & !sq_to_bb(from)) | sq_to_bb(to);
        self.update_aggregates();
        Ok(captured)
    }

    #[inline(always)]
    pub fn piece_bb(&self, color: Color, piece_type: PieceType) -> u64 {
        self.pieces[piece_index(color, piece_type)]
    }

    #[inline(always)]
    pub fn pieces_bb(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    #[inline(always)]
    pub fn occupied(&self) -> u64 {
        self.occupied
    }

    #[inline(always)]
    pub fn empty_squares(&self) -> u64 {
        !self.occupied
    }

    /// The 12 piece bitboards, white first.
    pub fn piece_bitboards(&self) -> &[u64; 12] {
        &self.pieces
    }

    pub fn piece_at(&self, sq: u8) -> Option<(Color, PieceType)> {
        if sq >= 64 || self.occupied & sq_to_bb(sq) == 0 {
            return None;
        }
        let idx = self.pieces.iter().position(|bb| bb & sq_to_bb(sq) != 0)?;
        let color = if idx < 6 { Color::White } else { Color::Black };
        PieceType::from_index(idx % 6).map(|piece_type| (color, piece_type))
    }

    /// Piece bitboards are disjoint and the aggregates are their unions.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0u64;
        for bb in self.pieces {
            if seen & bb != 0 {
                return false;
            }
            seen |= bb;
        }
        let white = self.pieces[..6].iter().fold(0, |acc, bb| acc | bb);
        let black = self.pieces[6..].iter().fold(0, |acc, bb| acc | bb);
        white == self.white && black == self.black && (white | black) == self.occupied
    }

    /// One line per occupied square, e.g. `e1 white king`.
    pub fn describe(&self) -> String {
        (0..64u8)
            .filter_map(|sq| {
                self.piece_at(sq).map(|(color, piece_type)| {
                    format!(
                        "{} {} {}",
                        sq_to_algebraic(sq),
                        color.to_human(),
                        piece_type.to_human()
                    )
                })
            })
            .join("\n")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            let line = (0..8u8)
                .map(|file| match self.piece_at(rank * 8 + file) {
                    Some((Color::White, piece_type)) => piece_type.to_char(),
                    Some((Color::Black, piece_type)) => piece_type.to_char().to_ascii_lowercase(),
                    None => '.',
                })
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
