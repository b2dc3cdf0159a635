use thiserror::Error;

use crate::types::Slider;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MagicError {
    /// The randomized search gave up. Practically unreachable with a sane budget, so
    /// this is treated as a fatal configuration error by callers.
    #[error("no {slider} magic found for square {square} after {attempts} attempts")]
    AttemptsExhausted {
        square: u8,
        slider: Slider,
        attempts: u64,
    },
    #[error("{slider} magic {magic:#018x} for square {square} maps different attack sets to one index")]
    Collision { square: u8, slider: Slider, magic: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("cannot restore position state: the state stack is empty")]
    Underflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("no pawn on square {0}")]
    NoPawnOnSquare(u8),
    #[error("square {0} is off the board")]
    SquareOutOfRange(u8),
    /// A pawn pushed onto the back rank without capturing. The move layout has no
    /// kind tag for this case.
    #[error("quiet promotion from {from} to {to} has no move encoding")]
    QuietPromotion { from: u8, to: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("piece bitboards overlap on {0:#018x}")]
    OverlappingPieces(u64),
    #[error("square {0} is already occupied")]
    SquareOccupied(u8),
    #[error("no piece on square {0}")]
    EmptySquare(u8),
    #[error("square {0} is off the board")]
    SquareOutOfRange(u8),
    #[error("could not read position: {0}")]
    Notation(String),
}
