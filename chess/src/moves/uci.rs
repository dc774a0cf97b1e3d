//! Parsing moves in coordinate notation
//!
//! A move looks like `e2e4` or `c7c8q`: the source square, the destination square and the
//! optional promote piece. Parsing is case-insensitive and ignores surrounding whitespace.

use super::base::{Move, PromotePiece};
use crate::error::ErrorKind;
use crate::types::{Coord, File, Rank};

use thiserror::Error;

/// Error parsing a move in coordinate notation
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    /// The move is too short
    #[error("move is incomplete")]
    Incomplete,
    /// The move contains non-ASCII characters
    #[error("non-ASCII data in move")]
    NonAscii,
    /// Both the file and the rank of the source square are outside the board
    #[error("source square {0:?} is out of board")]
    SrcOutOfBounds(String),
    /// A file is outside `a`..`h`
    #[error("file {0:?} is out of range")]
    FileOutOfRange(char),
    /// A rank was expected, but a non-digit character was found
    #[error("rank {0:?} is not a number")]
    NonNumericRank(char),
    /// A rank is a number, but not between 1 and 8
    #[error("rank {0} is out of range")]
    RankOutOfRange(String),
    /// Unknown promote piece
    #[error("bad promote char {0:?}")]
    BadPromote(char),
    /// Extra characters after the move
    #[error("extra data after move")]
    ExtraData,
}

impl ParseError {
    /// Returns the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::SrcOutOfBounds(_) => ErrorKind::OutOfBounds,
            ParseError::NonNumericRank(_) => ErrorKind::Format,
            ParseError::Incomplete
            | ParseError::NonAscii
            | ParseError::FileOutOfRange(_)
            | ParseError::RankOutOfRange(_)
            | ParseError::BadPromote(_)
            | ParseError::ExtraData => ErrorKind::Validation,
        }
    }
}

#[derive(Copy, Clone)]
enum End {
    Src,
    Dst,
}

fn parse_square(s: &[u8], end: End) -> Result<(Coord, &[u8]), ParseError> {
    let (&file_ch, rest) = s.split_first().ok_or(ParseError::Incomplete)?;
    let file_ch = file_ch as char;
    match (File::from_char(file_ch), parse_rank(rest)) {
        (Some(file), Ok((rank, rest))) => Ok((Coord::from_parts(file, rank), rest)),
        (Some(_), Err(e)) => Err(e),
        (None, Err(ParseError::RankOutOfRange(num))) if matches!(end, End::Src) => {
            Err(ParseError::SrcOutOfBounds(format!("{}{}", file_ch, num)))
        }
        (None, _) => Err(ParseError::FileOutOfRange(file_ch)),
    }
}

fn parse_rank(rest: &[u8]) -> Result<(Rank, &[u8]), ParseError> {
    let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return Err(match rest.first() {
            Some(&b) => ParseError::NonNumericRank(b as char),
            None => ParseError::Incomplete,
        });
    }
    let (num, rest) = rest.split_at(digits);
    let num: String = num.iter().map(|&b| b as char).collect();
    let rank = num
        .parse::<u32>()
        .ok()
        .and_then(Rank::from_number)
        .ok_or_else(|| ParseError::RankOutOfRange(num.clone()))?;
    Ok((rank, rest))
}

/// Parses a move in coordinate notation
///
/// The input is trimmed and lowercased. The source square is parsed first, then the
/// destination square, then the promote piece. The rank is the whole run of digits following
/// the file letter, so `e10` has rank 10, which is out of range.
///
/// A bad file is reported as [`ParseError::FileOutOfRange`]. Only a source square which is
/// off the board in both coordinates, like `i9`, gives [`ParseError::SrcOutOfBounds`].
///
/// ```
/// # use chessmove::moves::{uci, PromotePiece};
/// let mv = uci::parse(" C7C8Q ").unwrap();
/// assert_eq!(mv.to_string(), "c7c8q");
/// assert_eq!(mv.promote(), Some(PromotePiece::Queen));
/// assert_eq!(uci::parse("e2"), Err(uci::ParseError::Incomplete));
/// ```
pub fn parse(s: &str) -> Result<Move, ParseError> {
    let s = s.trim();
    if s.len() < 4 {
        return Err(ParseError::Incomplete);
    }
    if !s.is_ascii() {
        return Err(ParseError::NonAscii);
    }
    let s = s.to_ascii_lowercase();

    let (src, rest) = parse_square(s.as_bytes(), End::Src)?;
    let (dst, rest) = parse_square(rest, End::Dst)?;
    let promote = match rest {
        [] => None,
        [b] => Some(PromotePiece::from_char(*b as char).ok_or(ParseError::BadPromote(*b as char))?),
        _ => return Err(ParseError::ExtraData),
    };

    Ok(Move::new(src, dst, promote))
}
