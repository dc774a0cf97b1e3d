//! Top-level error type

use crate::board::{FenParseError, ValidateError};
use crate::fen::RawFenParseError;
use crate::moves::{self, uci};
use crate::service::MoveError;

use thiserror::Error;

/// Category of an [`Error`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input text is malformed
    Format,
    /// The input is well-formed, but violates the rules or the preconditions
    Validation,
    /// A square outside the board was referenced
    OutOfBounds,
}

/// Any error which can be returned by [`MoveService`](crate::MoveService)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum Error {
    /// FEN cannot be parsed
    #[error("bad fen: {0}")]
    Fen(#[from] RawFenParseError),
    /// FEN was parsed, but the position is invalid
    #[error("invalid position: {0}")]
    Position(#[from] ValidateError),
    /// Move cannot be parsed
    #[error("bad move: {0}")]
    Notation(#[from] uci::ParseError),
    /// Move was parsed, but cannot be made
    #[error("move rejected: {0}")]
    Move(#[from] MoveError),
}

impl Error {
    /// Returns the category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Fen(_) => ErrorKind::Format,
            Error::Position(_) => ErrorKind::Validation,
            Error::Notation(e) => e.kind(),
            Error::Move(_) => ErrorKind::Validation,
        }
    }
}

impl From<FenParseError> for Error {
    fn from(e: FenParseError) -> Self {
        match e {
            FenParseError::Fen(e) => Error::Fen(e),
            FenParseError::Valid(e) => Error::Position(e),
        }
    }
}

impl From<moves::ValidateError> for Error {
    fn from(e: moves::ValidateError) -> Self {
        Error::Move(e.into())
    }
}
