use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub fn other_color(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn to_human(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

/// Piece types in the fixed order used to lay out the per-color bitboards.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Rook,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Queen,
        PieceType::King,
    ];

    pub fn to_human(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    pub fn from_index(index: usize) -> Option<PieceType> {
        Self::ALL.get(index).copied()
    }
}

/// Promotion moves are always emitted in this order.
pub const PROMOTION_PIECES: [PieceType; 4] = [
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Rook,
    PieceType::Queen,
];

/// The two sliding piece families that get magic tables. Queens are the union of both.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    pub const ALL: [Slider; 2] = [Slider::Rook, Slider::Bishop];

    /// (rank delta, file delta) of every ray the slider moves along
    pub fn directions(&self) -> &'static [(i8, i8); 4] {
        match self {
            Slider::Rook => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            Slider::Bishop => &[(1, 1), (1, -1), (-1, 1), (-1, -1)],
        }
    }

    pub fn piece_type(&self) -> PieceType {
        match self {
            Slider::Rook => PieceType::Rook,
            Slider::Bishop => PieceType::Bishop,
        }
    }

    pub fn to_human(&self) -> &'static str {
        self.piece_type().to_human()
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_human())
    }
}
