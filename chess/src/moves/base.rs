use super::uci;
use crate::board::Position;
use crate::castling;
use crate::geometry;
use crate::types::{CastlingSide, Color, Coord, File, Piece};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Move kind, as determined by the position in which the move is made
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Non-pawn move or capture (except castling)
    Simple,
    /// Kingside castling
    CastlingKingside,
    /// Queenside castling
    CastlingQueenside,
    /// Single pawn move (either non-capture or capture)
    PawnSimple,
    /// Double pawn move
    PawnDouble,
    /// Enpassant
    Enpassant,
    /// Pawn promote to knight (either non-capture or capture)
    PromoteKnight,
    /// Pawn promote to bishop (either non-capture or capture)
    PromoteBishop,
    /// Pawn promote to rook (either non-capture or capture)
    PromoteRook,
    /// Pawn promote to queen (either non-capture or capture)
    PromoteQueen,
}

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PromotePiece {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PromotePiece {
    /// All the promote pieces, in the order in which the move generator emits them
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Knight,
        PromotePiece::Bishop,
        PromotePiece::Rook,
        PromotePiece::Queen,
    ];

    /// Returns the lowercase letter used in coordinate notation
    #[inline]
    pub fn as_char(&self) -> char {
        match *self {
            PromotePiece::Knight => 'n',
            PromotePiece::Bishop => 'b',
            PromotePiece::Rook => 'r',
            PromotePiece::Queen => 'q',
        }
    }

    #[inline]
    pub fn from_char(c: char) -> Option<PromotePiece> {
        match c {
            'n' => Some(PromotePiece::Knight),
            'b' => Some(PromotePiece::Bishop),
            'r' => Some(PromotePiece::Rook),
            'q' => Some(PromotePiece::Queen),
            _ => None,
        }
    }
}

impl From<PromotePiece> for Piece {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Knight => Piece::Knight,
            PromotePiece::Bishop => Piece::Bishop,
            PromotePiece::Rook => Piece::Rook,
            PromotePiece::Queen => Piece::Queen,
        }
    }
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastlingKingside,
            CastlingSide::Queen => Self::CastlingQueenside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::CastlingKingside => Ok(Self::King),
            MoveKind::CastlingQueenside => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

impl From<PromotePiece> for MoveKind {
    #[inline]
    fn from(kind: PromotePiece) -> Self {
        match kind {
            PromotePiece::Knight => Self::PromoteKnight,
            PromotePiece::Bishop => Self::PromoteBishop,
            PromotePiece::Rook => Self::PromoteRook,
            PromotePiece::Queen => Self::PromoteQueen,
        }
    }
}

impl TryFrom<MoveKind> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::PromoteKnight => Ok(Self::Knight),
            MoveKind::PromoteBishop => Ok(Self::Bishop),
            MoveKind::PromoteRook => Ok(Self::Rook),
            MoveKind::PromoteQueen => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

impl MoveKind {
    /// Returns the piece after promote if this move kind represents a promote
    ///
    /// Otherwise, returns `None`.
    #[inline]
    pub fn promote(self) -> Option<Piece> {
        let piece: PromotePiece = self.try_into().ok()?;
        Some(piece.into())
    }

    /// Classifies the move `mv` made in the position `p`
    ///
    /// The move is not required to be legal, but the result is meaningful only for the moves
    /// of the piece standing on the source square. A pawn reaching the last rank without the
    /// promote piece is treated as promoting to a queen.
    pub fn classify(p: &Position, mv: Move) -> MoveKind {
        let cell = p.get(mv.src);
        let (color, piece) = match (cell.color(), cell.piece()) {
            (Some(c), Some(piece)) => (c, piece),
            _ => return MoveKind::Simple,
        };
        match piece {
            Piece::Pawn => {
                if mv.dst.rank() == geometry::promote_dst_rank(color) {
                    return mv.promote.unwrap_or(PromotePiece::Queen).into();
                }
                let is_diag = mv.src.file() != mv.dst.file();
                if !is_diag && mv.src.rank().index().abs_diff(mv.dst.rank().index()) == 2 {
                    return MoveKind::PawnDouble;
                }
                if is_diag && Some(mv.dst) == p.ep_target() && p.get(mv.dst).is_empty() {
                    return MoveKind::Enpassant;
                }
                MoveKind::PawnSimple
            }
            Piece::King if mv.src == castling::king_src(color) => match mv.dst {
                d if d == Coord::from_parts(File::G, mv.src.rank()) => MoveKind::CastlingKingside,
                d if d == Coord::from_parts(File::C, mv.src.rank()) => MoveKind::CastlingQueenside,
                _ => MoveKind::Simple,
            },
            _ => MoveKind::Simple,
        }
    }
}

/// Error indicating that the move cannot be made in the given position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// There is no piece on the source square
    #[error("no piece on source square {0}")]
    EmptySource(Coord),
    /// The piece on the source square belongs to the side which is not to move
    #[error("piece on {src} does not belong to the side to move ({side:?})")]
    WrongSide { src: Coord, side: Color },
    /// The move is not among the legal moves
    #[error("move is not legal")]
    NotLegal,
}

/// Chess move
///
/// The move is written in coordinate notation: the source square, the destination square and
/// an optional promote piece. Castling is represented as the king moving two files.
///
/// Moves compare structurally, so a promotion without the promote piece is not equal to the
/// one promoting to a queen. Use [`Move::with_default_promote()`] to fill it in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Coord,
    dst: Coord,
    promote: Option<PromotePiece>,
}

impl Move {
    #[inline]
    pub const fn new(src: Coord, dst: Coord, promote: Option<PromotePiece>) -> Move {
        Move { src, dst, promote }
    }

    /// Parses the move from coordinate notation
    ///
    /// See [`uci::parse()`] for the details.
    #[inline]
    pub fn from_uci(s: &str) -> Result<Move, uci::ParseError> {
        uci::parse(s)
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    #[inline]
    pub const fn promote(&self) -> Option<PromotePiece> {
        self.promote
    }

    /// Returns the kind of this move in the position `p`
    #[inline]
    pub fn kind(&self, p: &Position) -> MoveKind {
        MoveKind::classify(p, *self)
    }

    /// Returns the move promoting to a queen if the pawn reaches the last rank and the
    /// promote piece is not given
    pub fn with_default_promote(self, p: &Position) -> Move {
        if self.promote.is_some() {
            return self;
        }
        let cell = p.get(self.src);
        let reaches_last_rank =
            cell.color().map(geometry::promote_dst_rank) == Some(self.dst.rank());
        if cell.piece() == Some(Piece::Pawn) && reaches_last_rank {
            return Move {
                promote: Some(PromotePiece::Queen),
                ..self
            };
        }
        self
    }

    /// Checks that the move is legal in the position `p`
    pub fn validate(&self, p: &Position) -> Result<(), ValidateError> {
        let color = p
            .get(self.src)
            .color()
            .ok_or(ValidateError::EmptySource(self.src))?;
        if color != p.side() {
            return Err(ValidateError::WrongSide {
                src: self.src,
                side: p.side(),
            });
        }
        if !p.legal_moves().contains(self) {
            return Err(ValidateError::NotLegal);
        }
        Ok(())
    }

    #[inline]
    pub fn is_legal(&self, p: &Position) -> bool {
        self.validate(p).is_ok()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.promote {
            write!(f, "{}", p.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = uci::ParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        uci::parse(s)
    }
}
