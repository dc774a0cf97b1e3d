//! Parsing and formatting positions in Forsyth-Edwards notation

use crate::board::RawBoard;
use crate::types::{
    self, CastlingRights, Cell, Color, Coord, File, Rank,
};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing the piece placement field of FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CellsParseError {
    /// Too many squares in one rank
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Too few squares in one rank
    #[error("too few items in rank {0}")]
    RankUnderflow(Rank),
    /// More than 8 ranks
    #[error("too many ranks")]
    Overflow,
    /// Less than 8 ranks
    #[error("too few ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing [`RawBoard`] from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawFenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// Error parsing the piece placement
    #[error("bad board: {0}")]
    Board(#[from] CellsParseError),
    /// Error parsing the side to move
    #[error("bad move side: {0}")]
    MoveSide(#[from] types::ColorParseError),
    /// Error parsing the castling rights
    #[error("bad castling rights: {0}")]
    Castling(#[from] types::CastlingRightsParseError),
    /// Error parsing the en passant target
    #[error("bad enpassant: {0}")]
    Enpassant(#[from] types::CoordParseError),
    /// Error parsing the half-move clock
    #[error("bad halfmove clock: {0}")]
    HalfmoveClock(ParseIntError),
    /// Error parsing the move number
    #[error("bad fullmove number: {0}")]
    FullmoveNumber(ParseIntError),
    /// FEN contains more than six fields
    #[error("extra data in FEN")]
    ExtraData,
}

/// Brings FEN text to the form which is used for parsing
///
/// Leading and trailing whitespace is removed, runs of inner whitespace are collapsed into a
/// single space, and whitespace adjacent to `/` is dropped.
///
/// ```
/// # use chessmove::fen;
/// assert_eq!(fen::normalize("  8/8 / 8\tw   -  "), "8/8/8 w -");
/// ```
pub fn normalize(s: &str) -> String {
    let mut res = String::with_capacity(s.len());
    let mut space = false;
    for ch in s.trim().chars() {
        if ch.is_whitespace() {
            space = true;
            continue;
        }
        if space && ch != '/' && !res.ends_with('/') {
            res.push(' ');
        }
        space = false;
        res.push(ch);
    }
    res
}

fn parse_cells(s: &str) -> Result<[Cell; 64], CellsParseError> {
    type Error = CellsParseError;

    let mut file = 0_usize;
    let mut rank = 0_usize;
    let mut cells = [Cell::EMPTY; 64];
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                file += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(Rank::from_index(rank)));
                }
                rank += 1;
                file = 0;
                if rank >= 8 {
                    return Err(Error::Overflow);
                }
            }
            b'.' => return Err(Error::UnexpectedChar('.')),
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(Rank::from_index(rank)));
                }
                let cell = Cell::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                cells[rank * 8 + file] = cell;
                file += 1;
            }
        }
    }

    if file < 8 {
        return Err(Error::RankUnderflow(Rank::from_index(rank)));
    }
    if rank < 7 {
        return Err(Error::Underflow);
    }
    Ok(cells)
}

/// Parses [`RawBoard`] from FEN
///
/// The input is normalized with [`normalize()`] first. Empty input denotes the initial
/// position. Only the piece placement field is mandatory; the missing trailing fields default
/// to `w`, `KQkq`, `-`, `0` and `1` respectively. The side to move and the en passant target
/// are case-insensitive, while the piece placement and castling rights are case-sensitive.
pub fn parse(s: &str) -> Result<RawBoard, RawFenParseError> {
    type Error = RawFenParseError;

    if !s.is_ascii() {
        return Err(Error::NonAscii);
    }
    let norm = normalize(s);
    if norm.is_empty() {
        return Ok(RawBoard::initial());
    }

    let mut iter = norm.split(' ');
    let cells = parse_cells(iter.next().unwrap_or_default())?;
    let side = match iter.next() {
        Some(s) => Color::from_str(&s.to_ascii_lowercase())?,
        None => Color::White,
    };
    let castling = match iter.next() {
        Some(s) => CastlingRights::from_str(s)?,
        None => CastlingRights::FULL,
    };
    let ep_target = match iter.next() {
        Some("-") | None => None,
        Some(s) => Some(Coord::from_str(&s.to_ascii_lowercase())?),
    };
    let halfmove_clock = match iter.next() {
        Some(s) => u16::from_str(s).map_err(Error::HalfmoveClock)?,
        None => 0,
    };
    let fullmove_number = match iter.next() {
        Some(s) => u16::from_str(s).map_err(Error::FullmoveNumber)?,
        None => 1,
    };
    if iter.next().is_some() {
        return Err(Error::ExtraData);
    }

    Ok(RawBoard {
        cells,
        side,
        castling,
        ep_target,
        halfmove_clock,
        fullmove_number,
    })
}

fn format_cells(cells: &[Cell; 64], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for rank in Rank::iter() {
        if rank.index() != 0 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let cell = cells[Coord::from_parts(file, rank).index()];
            if cell.is_empty() {
                empty += 1;
                continue;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
                empty = 0;
            }
            write!(f, "{}", cell)?;
        }
        if empty != 0 {
            write!(f, "{}", empty)?;
        }
    }
    Ok(())
}

/// Writes `b` as canonical FEN: six fields separated by single spaces, pieces of White in
/// uppercase, and everything else in lowercase
pub fn format(b: &RawBoard, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    format_cells(&b.cells, f)?;
    write!(f, " {} {}", b.side, b.castling)?;
    match b.ep_target {
        Some(p) => write!(f, " {}", p)?,
        None => write!(f, " -")?,
    };
    write!(f, " {} {}", b.halfmove_clock, b.fullmove_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Piece;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n "), "");
        assert_eq!(
            normalize("  rnbqkbnr / pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR   w KQkq -\t0 1 "),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_defaults() {
        let raw = parse("4k3/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(raw.side, Color::White);
        assert_eq!(raw.castling, CastlingRights::FULL);
        assert_eq!(raw.ep_target, None);
        assert_eq!(raw.halfmove_clock, 0);
        assert_eq!(raw.fullmove_number, 1);
        assert_eq!(raw.to_string(), "4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1");

        let raw = parse("4k3/8/8/8/8/8/8/4K3 b -").unwrap();
        assert_eq!(raw.to_string(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_case() {
        let raw = parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR B KQkq E3 0 1").unwrap();
        assert_eq!(raw.side, Color::Black);
        assert_eq!(raw.ep_target, Some(Coord::from_parts(File::E, Rank::R3)));
        assert_eq!(
            raw.get2(File::E, Rank::R4),
            Cell::from_parts(Color::White, Piece::Pawn)
        );
        assert_eq!(
            raw.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert!(matches!(
            parse("4k3/8/8/8/8/8/8/4K3 w kqKQ"),
            Ok(RawBoard { castling: CastlingRights::FULL, .. })
        ));
        assert!(matches!(
            parse("4k3/8/8/8/8/8/8/4K3 w x"),
            Err(RawFenParseError::Castling(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "r3k2r/pppq1ppp/2np1n2/2b1p1B1/2B1P1b1/2NP1N2/PPPQ1PPP/R3K2R w KQkq - 4 8",
            "8/8/8/3pP3/8/8/2k5/K7 w - d6 0 40",
            "8/2P5/8/8/8/8/8/k1K5 w - - 19 90",
        ] {
            assert_eq!(parse(fen).unwrap().to_string(), fen);
            assert_eq!(parse(&format!("  {} ", fen)).unwrap().to_string(), fen);
        }
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("e3"), Err(CellsParseError::UnexpectedChar('e').into()));
        assert_eq!(parse("8/8/8/8/8/8/8/9"), Err(CellsParseError::UnexpectedChar('9').into()));
        assert_eq!(
            parse("8/8/8/8/8/8/8/8/8"),
            Err(CellsParseError::Overflow.into())
        );
        assert_eq!(parse("8/8/8"), Err(CellsParseError::Underflow.into()));
        assert_eq!(
            parse("7/8/8/8/8/8/8/8"),
            Err(CellsParseError::RankUnderflow(Rank::R8).into())
        );
        assert_eq!(
            parse("8/8/ppppppppp/8/8/8/8/8"),
            Err(CellsParseError::RankOverflow(Rank::R6).into())
        );
        assert_eq!(
            parse("8/8/8/8/8/8/8/........"),
            Err(CellsParseError::UnexpectedChar('.').into())
        );
        assert_eq!(parse("8/8/8/8/8/8/8/8 ф"), Err(RawFenParseError::NonAscii));
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 x"),
            Err(RawFenParseError::MoveSide(_))
        ));
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - z9"),
            Err(RawFenParseError::Enpassant(_))
        ));
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - - x"),
            Err(RawFenParseError::HalfmoveClock(_))
        ));
        assert!(matches!(
            parse("8/8/8/8/8/8/8/8 w - - 0 -1"),
            Err(RawFenParseError::FullmoveNumber(_))
        ));
        assert_eq!(
            parse("8/8/8/8/8/8/8/8 w - - 0 1 extra"),
            Err(RawFenParseError::ExtraData)
        );
    }
}
