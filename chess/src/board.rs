//! Board and related things

use crate::bitboard::Bitboard;
use crate::fen::{self, RawFenParseError};
use crate::movegen::{self, MoveList};
use crate::moves::{self, Move, ValidateError as MoveValidateError};
use crate::status::{self, Status};
use crate::types::{CastlingRights, CastlingSide, Cell, Color, Coord, File, Piece, Rank};
use crate::geometry;

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

/// Position validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// En passant target is located on a rank which cannot hold it for the current side
    #[error("invalid enpassant target {0}")]
    InvalidEnpassant(Coord),
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed, and the pieces beyond the initial set
    /// must be covered by the missing pawns, as if they were promoted.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Coord),
    /// The side which is not to move is in check
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing [`Position`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN text cannot be parsed
    #[error("cannot parse fen: {0}")]
    Fen(#[from] RawFenParseError),
    /// FEN was parsed, but the position is invalid
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Raw chess board
///
/// Raw board contains all the information which FEN carries about the position. But, unlike
/// [`Position`], it is not validated and may contain an invalid position.
///
/// Raw board can be used to build a position programmatically. After changing the necessary
/// fields, it must be converted to [`Position`] via [`Position::try_from()`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawBoard {
    /// Contents of the board, indexed by [`Coord::index()`]
    pub cells: [Cell; 64],
    /// Side to move
    pub side: Color,
    /// Castling rights
    pub castling: CastlingRights,
    /// En passant target, i.e. the square passed over by a pawn which has just made a double move
    pub ep_target: Option<Coord>,
    /// Number of half-moves since the last pawn move or capture
    pub halfmove_clock: u16,
    /// Move number. It starts from 1 and is incremented after each move by Black
    pub fullmove_number: u16,
}

impl RawBoard {
    /// Returns an empty `RawBoard`
    #[inline]
    pub const fn empty() -> RawBoard {
        RawBoard {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Returns a board with the initial position
    pub fn initial() -> RawBoard {
        let mut res = RawBoard {
            castling: CastlingRights::FULL,
            ..RawBoard::empty()
        };
        for file in File::iter() {
            res.put2(file, Rank::R2, Cell::from_parts(Color::White, Piece::Pawn));
            res.put2(file, Rank::R7, Cell::from_parts(Color::Black, Piece::Pawn));
        }
        let back = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (color, rank) in [(Color::White, Rank::R1), (Color::Black, Rank::R8)] {
            for (file, piece) in File::iter().zip(back) {
                res.put2(file, rank, Cell::from_parts(color, piece));
            }
        }
        res
    }

    /// Parses a board from FEN
    ///
    /// See [`fen::parse()`] for the accepted syntax.
    #[inline]
    pub fn from_fen(s: &str) -> Result<RawBoard, RawFenParseError> {
        fen::parse(s)
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.cells[c.index()]
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Coord::from_parts(file, rank))
    }

    #[inline]
    pub fn put(&mut self, c: Coord, cell: Cell) {
        self.cells[c.index()] = cell;
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Coord::from_parts(file, rank), cell);
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// ```
    /// # use chessmove::{RawBoard, board::PrettyStyle};
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(RawBoard::initial().pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { raw: self, style }
    }

    /// Converts the board into a canonical FEN string
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl Default for RawBoard {
    #[inline]
    fn default() -> RawBoard {
        RawBoard::empty()
    }
}

impl FromStr for RawBoard {
    type Err = RawFenParseError;

    fn from_str(s: &str) -> Result<RawBoard, Self::Err> {
        fen::parse(s)
    }
}

impl Display for RawBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fen::format(self, f)
    }
}

/// Position that is guaranteed to be valid
///
/// This is the value every rules operation works with: move generation, applying moves and
/// evaluating the game status. A position is immutable from the outside; applying a move
/// produces a new position and leaves the old one intact.
///
/// Alongside with the [`RawBoard`], it keeps square sets of the pieces to make attack
/// detection cheaper.
#[derive(Debug, Clone)]
pub struct Position {
    pub(crate) r: RawBoard,
    pub(crate) white: Bitboard,
    pub(crate) black: Bitboard,
    pub(crate) pieces: [Bitboard; Cell::COUNT],
}

impl Position {
    /// Returns the initial position
    pub fn initial() -> Position {
        Position::from_raw_unchecked(RawBoard::initial())
    }

    /// Parses a position from FEN
    ///
    /// Empty or whitespace-only input yields the initial position.
    pub fn from_fen(s: &str) -> Result<Position, FenParseError> {
        Ok(RawBoard::from_fen(s)?.try_into()?)
    }

    fn from_raw_unchecked(r: RawBoard) -> Position {
        let mut res = Position {
            r: RawBoard { cells: [Cell::EMPTY; 64], ..r },
            white: Bitboard::EMPTY,
            black: Bitboard::EMPTY,
            pieces: [Bitboard::EMPTY; Cell::COUNT],
        };
        for coord in Coord::iter() {
            res.put(coord, r.get(coord));
        }
        res
    }

    /// Returns a view over the raw board
    #[inline]
    pub fn raw(&self) -> &RawBoard {
        &self.r
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Cell {
        self.r.get(c)
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.r.get2(file, rank)
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.r.side
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.r.castling
    }

    #[inline]
    pub fn ep_target(&self) -> Option<Coord> {
        self.r.ep_target
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.r.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.r.fullmove_number
    }

    /// Returns the squares occupied by the pieces of color `c`
    #[inline]
    pub fn color(&self, c: Color) -> Bitboard {
        match c {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Returns the squares occupied by any piece
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.white | self.black
    }

    /// Returns the squares with the pieces equal to `c`
    ///
    /// **Note**: for an empty cell, the function just returns an empty bitboard.
    #[inline]
    pub fn piece(&self, c: Cell) -> Bitboard {
        self.pieces[c.index()]
    }

    #[inline]
    pub fn piece2(&self, c: Color, p: Piece) -> Bitboard {
        self.piece(Cell::from_parts(c, p))
    }

    /// Returns the position of the king of color `c`
    #[inline]
    pub fn king_pos(&self, c: Color) -> Coord {
        self.piece2(c, Piece::King)
            .into_iter()
            .next()
            .expect("valid position has a king of each color")
    }

    /// Puts `cell` on the square `c`, keeping the square sets in sync
    pub(crate) fn put(&mut self, c: Coord, cell: Cell) {
        let old = self.r.get(c);
        if let Some(color) = old.color() {
            match color {
                Color::White => self.white.unset(c),
                Color::Black => self.black.unset(c),
            };
            self.pieces[old.index()].unset(c);
        }
        if let Some(color) = cell.color() {
            match color {
                Color::White => self.white.set(c),
                Color::Black => self.black.set(c),
            };
            self.pieces[cell.index()].set(c);
        }
        self.r.put(c, cell);
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        let c = self.r.side;
        movegen::is_cell_attacked(self, self.king_pos(c), c.inv())
    }

    /// Returns `true` if the king of the side which is not to move is attacked
    #[inline]
    pub fn is_opponent_king_attacked(&self) -> bool {
        let c = self.r.side;
        movegen::is_cell_attacked(self, self.king_pos(c.inv()), c)
    }

    /// Returns all the pieces that give check currently
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        let c = self.r.side;
        movegen::cell_attackers(self, self.king_pos(c), c.inv())
    }

    /// Returns `true` if the side to move has at least one legal move
    #[inline]
    pub fn has_legal_moves(&self) -> bool {
        movegen::has_legal_moves(self)
    }

    /// Returns all the legal moves for the side to move
    #[inline]
    pub fn legal_moves(&self) -> MoveList {
        movegen::legal::gen_all(self)
    }

    /// Evaluates the game status in this position
    ///
    /// Mate is reported from the winner's point of view, i.e. as [`Status::WhiteWon`] or
    /// [`Status::BlackWon`]. This function can be computationally expensive, as it needs to
    /// know whether any legal move exists.
    #[inline]
    pub fn calc_status(&self) -> Status {
        status::classify(self).resolve(self.r.side)
    }

    /// Validates the move `mv` and returns the position after it
    pub fn make_move(&self, mv: Move) -> Result<Position, MoveValidateError> {
        mv.validate(self)?;
        Ok(moves::apply(self, mv))
    }

    /// Wraps the position to allow pretty-printing with the given style
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        self.r.pretty(style)
    }

    /// Converts the position into a canonical FEN string
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Position {
    #[inline]
    fn eq(&self, other: &Position) -> bool {
        self.r == other.r
    }
}

impl Eq for Position {}

impl Hash for Position {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.r.hash(state)
    }
}

impl TryFrom<RawBoard> for Position {
    type Error = ValidateError;

    fn try_from(mut raw: RawBoard) -> Result<Position, ValidateError> {
        if let Some(p) = raw.ep_target {
            if p.rank() != geometry::enpassant_dst_rank(raw.side) {
                return Err(ValidateError::InvalidEnpassant(p));
            }
        }

        // Castling rights are meaningless once the king or the rook has left its square
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            if !raw.get2(File::E, rank).is(color, Piece::King) {
                raw.castling.unset_color(color);
            }
            if !raw.get2(File::A, rank).is(color, Piece::Rook) {
                raw.castling.unset(color, CastlingSide::Queen);
            }
            if !raw.get2(File::H, rank).is(color, Piece::Rook) {
                raw.castling.unset(color, CastlingSide::King);
            }
        }

        let res = Position::from_raw_unchecked(raw);

        for color in [Color::White, Color::Black] {
            if res.color(color).len() > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
            let extra =
                |piece, initial: u32| res.piece2(color, piece).len().saturating_sub(initial);
            let promoted = extra(Piece::Knight, 2)
                + extra(Piece::Bishop, 2)
                + extra(Piece::Rook, 2)
                + extra(Piece::Queen, 1);
            if res.piece2(color, Piece::Pawn).len() + promoted > 8 {
                return Err(ValidateError::TooManyPieces(color));
            }
            match res.piece2(color, Piece::King).len() {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }

        let pawns = res.piece2(Color::White, Piece::Pawn) | res.piece2(Color::Black, Piece::Pawn);
        if let Some(p) = pawns
            .into_iter()
            .find(|p| matches!(p.rank(), Rank::R1 | Rank::R8))
        {
            return Err(ValidateError::InvalidPawn(p));
        }

        if res.is_opponent_king_attacked() {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(res)
    }
}

impl TryFrom<&RawBoard> for Position {
    type Error = ValidateError;

    fn try_from(raw: &RawBoard) -> Result<Position, ValidateError> {
        (*raw).try_into()
    }
}

impl FromStr for Position {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Position, Self::Err> {
        Position::from_fen(s)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.r.fmt(f)
    }
}

/// Style for [`RawBoard::pretty()`] and [`Position::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as Unicode characters
    Utf8,
}

struct Frame {
    horz: char,
    vert: char,
    angle: char,
    indicator: [char; 2],
    cell: fn(&Cell) -> char,
}

impl PrettyStyle {
    fn frame(self) -> Frame {
        match self {
            PrettyStyle::Ascii => Frame {
                horz: '-',
                vert: '|',
                angle: '+',
                indicator: ['W', 'B'],
                cell: Cell::as_char,
            },
            PrettyStyle::Utf8 => Frame {
                horz: '─',
                vert: '│',
                angle: '┼',
                indicator: ['○', '●'],
                cell: Cell::as_utf8_char,
            },
        }
    }
}

/// Wrapper to pretty-print the board
///
/// See docs for [`RawBoard::pretty()`] for more details.
pub struct Pretty<'a> {
    raw: &'a RawBoard,
    style: PrettyStyle,
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let frame = self.style.frame();
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, frame.vert)?;
            for file in File::iter() {
                write!(f, "{}", (frame.cell)(&self.raw.get2(file, rank)))?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", frame.horz, frame.angle)?;
        for _ in File::iter() {
            write!(f, "{}", frame.horz)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", frame.indicator[self.raw.side.index()], frame.vert)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INI_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    #[test]
    fn test_initial() {
        assert_eq!(RawBoard::initial().to_string(), INI_FEN);
        assert_eq!(Position::initial().to_string(), INI_FEN);
        assert_eq!(RawBoard::from_str(INI_FEN), Ok(RawBoard::initial()));
        assert_eq!(Position::from_str(INI_FEN), Ok(Position::initial()));
        assert_eq!(Position::from_fen(""), Ok(Position::initial()));
        assert_eq!(Position::from_fen("  \t "), Ok(Position::initial()));
    }

    #[test]
    fn test_midgame() {
        const FEN: &str = "1rq1r1k1/1p3ppp/pB3n2/3ppP2/Pbb1P3/1PN2B2/2P2QPP/R1R4K w - - 1 21";

        let p = Position::from_fen(FEN).unwrap();
        assert_eq!(p.as_fen(), FEN);
        assert_eq!(
            p.get2(File::B, Rank::R4),
            Cell::from_parts(Color::Black, Piece::Bishop)
        );
        assert_eq!(
            p.get2(File::F, Rank::R2),
            Cell::from_parts(Color::White, Piece::Queen)
        );
        assert_eq!(p.king_pos(Color::White), Coord::from_parts(File::H, Rank::R1));
        assert_eq!(p.king_pos(Color::Black), Coord::from_parts(File::G, Rank::R8));
        assert_eq!(p.side(), Color::White);
        assert_eq!(p.castling(), CastlingRights::EMPTY);
        assert_eq!(p.ep_target(), None);
        assert_eq!(p.halfmove_clock(), 1);
        assert_eq!(p.fullmove_number(), 21);
        assert_eq!(p.color(Color::White).len(), 14);
        assert_eq!(p.occupied().len(), 28);
    }

    #[test]
    fn test_castling_fixes() {
        const FEN: &str = "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w KQkq - 6 5";

        let raw = RawBoard::from_fen(FEN).unwrap();
        assert_eq!(raw.castling, CastlingRights::FULL);
        assert_eq!(raw.as_fen(), FEN);

        let p: Position = raw.try_into().unwrap();
        assert_eq!(
            p.castling(),
            CastlingRights::EMPTY.with(Color::White, CastlingSide::Queen)
        );
        assert_eq!(
            p.as_fen(),
            "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w Q - 6 5"
        );
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ValidateError::NoKing(Color::Black).into())
        );
        assert_eq!(
            Position::from_fen("6K1/6P1/8/6K1/8/8/8/8 w - - 0 54"),
            Err(ValidateError::TooManyKings(Color::White).into())
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/P3K3 w - - 0 1"),
            Err(ValidateError::InvalidPawn(Coord::from_parts(File::A, Rank::R1)).into())
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/4K2R b - - 0 1").map(|p| p.is_check()),
            Ok(false)
        );
        assert_eq!(
            Position::from_fen("4k2R/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ValidateError::OpponentKingAttacked.into())
        );
        assert_eq!(
            Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - e3 0 1"),
            Err(ValidateError::InvalidEnpassant(Coord::from_parts(File::E, Rank::R3)).into())
        );
    }

    #[test]
    fn test_piece_counts() {
        // 257 legal moves if accepted
        assert_eq!(
            Position::from_fen("1Q1QQQQK/Q6Q/Q1Q4Q/Q6Q/3Q3Q/QQ5Q/ppQ4Q/knQQQQQQ w - - 0 1"),
            Err(ValidateError::TooManyPieces(Color::White).into())
        );
        assert_eq!(
            Position::from_fen("qqqqk3/pppppppp/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ValidateError::TooManyPieces(Color::Black).into())
        );
        assert_eq!(
            Position::from_fen("nnnnk3/ppppppp1/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ValidateError::TooManyPieces(Color::Black).into())
        );
        assert!(Position::from_fen("nnnnk3/pppppp2/8/8/8/8/8/4K3 w - - 0 1").is_ok());

        let p = Position::from_fen("3Q4/1Q4Q1/4Q3/2Q4R/Q4Q2/3Q4/NR4Q1/kN1BB1K1 w - - 0 1").unwrap();
        assert!(p.legal_moves().len() <= 218);
    }

    #[test]
    fn test_put_keeps_sets() {
        let mut p = Position::initial();
        let e2 = Coord::from_parts(File::E, Rank::R2);
        let e4 = Coord::from_parts(File::E, Rank::R4);
        let pawn = Cell::from_parts(Color::White, Piece::Pawn);
        p.put(e2, Cell::EMPTY);
        p.put(e4, pawn);
        assert!(!p.occupied().has(e2));
        assert!(p.color(Color::White).has(e4));
        assert!(p.piece(pawn).has(e4));
        assert_eq!(p.piece(pawn).len(), 8);
        assert_eq!(
            p.as_fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_pretty() {
        let p = Position::from_fen("6k1/6P1/8/6K1/8/8/8/8 b - - 0 1").unwrap();
        let res = r#"
8|......k.
7|......P.
6|........
5|......K.
4|........
3|........
2|........
1|........
-+--------
B|abcdefgh
"#;
        assert_eq!(p.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
        let utf8 = p.pretty(PrettyStyle::Utf8).to_string();
        assert!(utf8.starts_with("8│......♚."));
        assert!(utf8.trim_end().ends_with("●│abcdefgh"));
    }
}
